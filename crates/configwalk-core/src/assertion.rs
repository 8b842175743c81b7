//! The "assert file" operation

use std::any::TypeId;

use configwalk_graph::{Field, FieldPath, Value};

use crate::classify::{Classifier, FieldClass};
use crate::report::{Finding, Reporter};
use crate::walk::{concrete, root_path, Step, Visitor, Walker};

/// Check that every file-like field reachable from `root` equals `want`
///
/// Every mismatch is reported as a [`Finding::FileMismatch`] and every shared
/// pointee that is mutably borrowed elsewhere as a [`Finding::Borrowed`]; the
/// walk always completes. A root that is a polymorphic slot is unwrapped first, so paths
/// start at `(ConcreteTypeName)`.
///
/// Returns `true` if nothing was reported.
pub fn assert_file(
    reporter: &mut dyn Reporter,
    root: &dyn Value,
    want: &str,
    classifier: &Classifier,
) -> bool {
    let root = concrete(root);
    let path = root_path(root);
    let mut walker = Walker::new(AssertFile {
        reporter,
        want,
        classifier,
        mismatches: 0,
    });
    walker.walk(&path, root);
    let mismatches = walker.visitor.mismatches;
    tracing::debug!(
        root = %path,
        want,
        nodes = walker.stats.nodes,
        pointers = walker.stats.pointers,
        revisits = walker.stats.revisits,
        mismatches,
        "assert file"
    );
    mismatches == 0
}

struct AssertFile<'a> {
    reporter: &'a mut dyn Reporter,
    want: &'a str,
    classifier: &'a Classifier,
    mismatches: usize,
}

impl AssertFile<'_> {
    fn check(&mut self, path: FieldPath, got: &str) {
        if got != self.want {
            self.mismatches += 1;
            self.reporter.report(Finding::FileMismatch {
                path,
                got: got.to_owned(),
                want: self.want.to_owned(),
            });
        }
    }
}

impl Visitor for AssertFile<'_> {
    fn borrowed(&mut self, path: &FieldPath) {
        self.mismatches += 1;
        self.reporter.report(Finding::Borrowed { path: path.clone() });
    }

    fn field(
        &mut self,
        path: &FieldPath,
        record: TypeId,
        fields: &[Field<'_>],
        index: usize,
    ) -> Step {
        let field = &fields[index];
        match self.classifier.classify(record, &field.def) {
            FieldClass::Skip => Step::Skip,
            FieldClass::Plain => Step::Descend,
            FieldClass::File => {
                if let Some(got) = field.value.as_any().downcast_ref::<String>() {
                    self.check(path.field(field.def.name()), got);
                }
                Step::Done
            }
            FieldClass::Files => {
                if let Some(files) = field.value.as_any().downcast_ref::<Vec<String>>() {
                    let base = path.field(field.def.name());
                    for (i, got) in files.iter().enumerate() {
                        self.check(base.index(i), got);
                    }
                }
                Step::Done
            }
        }
    }
}
