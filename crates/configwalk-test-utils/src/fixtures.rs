//! Object graphs exercising every node kind
//!
//! Each setter resolves its own file fields; `disable` short-circuits that so
//! tests can simulate an implementation that forgets a field.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use configwalk_core::{exclude_field, include_field, Classifier, FieldOption};
use configwalk_graph::{join_dir, newtype, record, Config, Secret, SetDirectory};

/// Box a setter into a polymorphic slot
pub fn slot<C: Config>(config: C) -> Option<Box<dyn Config>> {
    Some(Box::new(config))
}

#[derive(Default)]
pub struct Root {
    pub child: Option<Box<dyn Config>>,
    pub cyclic: Option<Rc<RefCell<Cyclic>>>,
    pub map: SetterMap,
    pub slice: SetterSlice,
    pub root_file: String,
}

impl SetDirectory for Root {
    fn set_directory(&mut self, dir: &str) {
        self.child.set_directory(dir);
        self.cyclic.set_directory(dir);
        self.map.set_directory(dir);
        self.slice.set_directory(dir);
        self.root_file = join_dir(dir, &self.root_file);
    }
}

record!(Root: SetDirectory { child, cyclic, map, slice, root_file });

#[derive(Default)]
pub struct Cyclic {
    pub self_ref: Option<Rc<RefCell<Cyclic>>>,
    pub cyclic_file: String,
}

impl Cyclic {
    /// A cyclic node pointing at itself
    pub fn looped(file: &str) -> Rc<RefCell<Self>> {
        let node = Rc::new(RefCell::new(Self {
            self_ref: None,
            cyclic_file: file.to_owned(),
        }));
        node.borrow_mut().self_ref = Some(Rc::clone(&node));
        node
    }
}

impl SetDirectory for Cyclic {
    fn set_directory(&mut self, dir: &str) {
        self.cyclic_file = join_dir(dir, &self.cyclic_file);
    }
}

record!(Cyclic: SetDirectory { self_ref, cyclic_file });

#[derive(Default)]
pub struct SetterMap(pub BTreeMap<String, Option<Box<dyn Config>>>);

impl SetterMap {
    pub fn with(mut self, key: &str, value: Option<Box<dyn Config>>) -> Self {
        self.0.insert(key.to_owned(), value);
        self
    }
}

impl SetDirectory for SetterMap {
    fn set_directory(&mut self, dir: &str) {
        for config in self.0.values_mut().flatten() {
            config.set_directory(dir);
        }
    }
}

newtype!(SetterMap(BTreeMap<String, Option<Box<dyn Config>>>): SetDirectory);

#[derive(Default)]
pub struct SetterSlice(pub Vec<Option<Box<dyn Config>>>);

impl SetDirectory for SetterSlice {
    fn set_directory(&mut self, dir: &str) {
        for config in self.0.iter_mut().flatten() {
            config.set_directory(dir);
        }
    }
}

newtype!(SetterSlice(Vec<Option<Box<dyn Config>>>): SetDirectory);

#[derive(Default)]
pub struct Inner {
    pub child: Option<Box<dyn Config>>,
    pub disable: bool,
}

impl SetDirectory for Inner {
    fn set_directory(&mut self, dir: &str) {
        if self.disable {
            return;
        }
        self.child.set_directory(dir);
    }
}

record!(Inner: SetDirectory { child, disable });

#[derive(Default)]
pub struct FooSetter {
    pub foo: Secret,
    pub foo_file: String,
    pub extra: String,
    pub disable: bool,
}

impl FooSetter {
    pub fn with_file(file: &str) -> Self {
        Self {
            foo_file: file.to_owned(),
            ..Self::default()
        }
    }
}

impl SetDirectory for FooSetter {
    fn set_directory(&mut self, dir: &str) {
        if self.disable {
            return;
        }
        self.foo_file = join_dir(dir, &self.foo_file);
    }
}

record!(FooSetter: SetDirectory { foo, foo_file, extra, disable });

#[derive(Default)]
pub struct BarSetter {
    pub bar_files: Vec<String>,
    pub extra: String,
    pub disable: bool,
}

impl BarSetter {
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            bar_files: files.iter().map(|&f| f.to_owned()).collect(),
            ..Self::default()
        }
    }
}

impl SetDirectory for BarSetter {
    fn set_directory(&mut self, dir: &str) {
        if self.disable {
            return;
        }
        for file in &mut self.bar_files {
            *file = join_dir(dir, file);
        }
    }
}

record!(BarSetter: SetDirectory { bar_files, extra, disable });

/// Follows the file convention by name but is not a file
#[derive(Default)]
pub struct ExcludeFile {
    pub exclude_file: String,
}

impl SetDirectory for ExcludeFile {
    fn set_directory(&mut self, _dir: &str) {}
}

record!(ExcludeFile: SetDirectory { exclude_file });

/// A file without the conventional name
#[derive(Default)]
pub struct IncludeFile {
    pub extra: String,
    pub disable: bool,
}

impl SetDirectory for IncludeFile {
    fn set_directory(&mut self, dir: &str) {
        if self.disable {
            return;
        }
        self.extra = join_dir(dir, &self.extra);
    }
}

record!(IncludeFile: SetDirectory { extra, disable });

/// A file list without the conventional name
#[derive(Default)]
pub struct IncludeFiles {
    pub extras: Vec<String>,
    pub disable: bool,
}

impl SetDirectory for IncludeFiles {
    fn set_directory(&mut self, dir: &str) {
        if self.disable {
            return;
        }
        for file in &mut self.extras {
            *file = join_dir(dir, file);
        }
    }
}

record!(IncludeFiles: SetDirectory { extras, disable });

/// Inline value with a plain-string sibling, plus a hidden file field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSetter {
    pub token: String,
    pub token_file: String,
    pub cache_file: String,
}

impl SetDirectory for TokenSetter {
    fn set_directory(&mut self, dir: &str) {
        self.token_file = join_dir(dir, &self.token_file);
    }
}

record!(TokenSetter: SetDirectory { token, token_file } hidden { cache_file });

/// Overrides matching the fixtures: `ExcludeFile.exclude_file` is not a
/// file, `IncludeFile.extra` and `IncludeFiles.extras` are
pub fn standard_options() -> Vec<FieldOption> {
    [
        exclude_field(&ExcludeFile::default(), "exclude_file"),
        include_field(&IncludeFile::default(), "extra"),
        include_field(&IncludeFiles::default(), "extras"),
    ]
    .into_iter()
    .collect::<Result<_, _>>()
    .expect("fixture fields exist")
}

/// Default convention plus [`standard_options`]
pub fn standard_classifier() -> Classifier {
    standard_options().into_iter().collect()
}

/// The full fixture graph with every file field set to `file`
///
/// `ExcludeFile.exclude_file` stays empty, map key `nil` and the last slice
/// element are empty slots.
pub fn sample_root(file: &str) -> Root {
    let files = [file];
    Root {
        child: slot(Inner {
            child: slot(FooSetter::with_file(file)),
            disable: false,
        }),
        cyclic: Some(Cyclic::looped(file)),
        map: SetterMap::default()
            .with("foo", slot(FooSetter::with_file(file)))
            .with("bar", slot(BarSetter::with_files(&files)))
            .with(
                "inner",
                slot(Inner {
                    child: slot(SetterSlice(vec![
                        slot(FooSetter::with_file(file)),
                        slot(BarSetter::with_files(&files)),
                    ])),
                    disable: false,
                }),
            )
            .with("nil", None),
        slice: SetterSlice(vec![
            slot(FooSetter::with_file(file)),
            slot(BarSetter::with_files(&files)),
            slot(ExcludeFile::default()),
            slot(IncludeFile {
                extra: file.to_owned(),
                disable: false,
            }),
            slot(IncludeFiles {
                extras: files.iter().map(|&f| f.to_owned()).collect(),
                disable: false,
            }),
            None,
        ]),
        root_file: file.to_owned(),
    }
}

/// Break the self-reference so the graph can be dropped
pub fn unlink(root: &Root) {
    if let Some(cyclic) = &root.cyclic {
        cyclic.borrow_mut().self_ref = None;
    }
}
