//! The "set file" operation
//!
//! Replaces every file-like field in a graph with one constant path.

use std::any::TypeId;

use configwalk_graph::{FieldMut, FieldType, Secret, Value};

use crate::classify::{Classifier, FieldClass};
use crate::walk::{MutVisitor, Step, Walker};

/// Set every file-like field reachable from `root` to `file`
///
/// Singular file fields are overwritten, clearing their raw-value sibling
/// (`foo` for `foo_file`) when it is a plain `String`, or a [`Secret`] when
/// the convention asks for it. Plural file fields become `vec![file]`.
pub fn set_file(root: &mut dyn Value, file: &str, classifier: &Classifier) {
    let root_type = root.type_name();
    let mut walker = Walker::new(SetFile {
        file,
        classifier,
        rewritten: 0,
    });
    walker.walk_mut(root);
    tracing::debug!(
        root = %root_type,
        file,
        nodes = walker.stats.nodes,
        pointers = walker.stats.pointers,
        revisits = walker.stats.revisits,
        rewritten = walker.visitor.rewritten,
        "set file"
    );
}

struct SetFile<'a> {
    file: &'a str,
    classifier: &'a Classifier,
    rewritten: usize,
}

impl SetFile<'_> {
    fn clear_sibling(&self, fields: &mut [FieldMut<'_>], index: usize) {
        let Some(sibling) = self
            .classifier
            .convention()
            .sibling_of(fields[index].def.name())
        else {
            return;
        };
        let clear_secrets = self.classifier.convention().clear_secret_siblings;
        let Some(field) = fields
            .iter_mut()
            .find(|f| f.def.is_exported() && f.def.name() == sibling)
        else {
            return;
        };
        match field.def.ty() {
            FieldType::String => {
                if let Some(value) = field.value.as_any_mut().downcast_mut::<String>() {
                    value.clear();
                }
            }
            FieldType::Secret if clear_secrets => {
                if let Some(value) = field.value.as_any_mut().downcast_mut::<Secret>() {
                    value.clear();
                }
            }
            _ => {}
        }
    }
}

impl MutVisitor for SetFile<'_> {
    fn field(&mut self, record: TypeId, fields: &mut [FieldMut<'_>], index: usize) -> Step {
        match self.classifier.classify(record, &fields[index].def) {
            FieldClass::Skip => Step::Skip,
            FieldClass::Plain => Step::Descend,
            FieldClass::File => {
                self.clear_sibling(fields, index);
                if let Some(value) = fields[index].value.as_any_mut().downcast_mut::<String>() {
                    self.file.clone_into(value);
                    self.rewritten += 1;
                }
                Step::Done
            }
            FieldClass::Files => {
                if let Some(value) = fields[index]
                    .value
                    .as_any_mut()
                    .downcast_mut::<Vec<String>>()
                {
                    *value = vec![self.file.to_owned()];
                    self.rewritten += 1;
                }
                Step::Done
            }
        }
    }
}
