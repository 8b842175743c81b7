//! The "set directory" operation

use std::any::TypeId;

use configwalk_graph::{FieldMut, Value};

use crate::walk::{MutVisitor, Step, Walker};

/// Call [`SetDirectory`](configwalk_graph::SetDirectory) with `dir` on every
/// value reachable from `root` that registers it
///
/// The walk descends into every field (hidden ones included) whether or not
/// the value it is on registered the capability. Each shared allocation is
/// entered once, so its capability runs once per call.
pub fn set_directory(root: &mut dyn Value, dir: &str) {
    let root_type = root.type_name();
    let mut walker = Walker::new(ApplyDirectory { dir, calls: 0 });
    walker.walk_mut(root);
    tracing::debug!(
        root = %root_type,
        dir,
        nodes = walker.stats.nodes,
        pointers = walker.stats.pointers,
        revisits = walker.stats.revisits,
        calls = walker.visitor.calls,
        "set directory"
    );
}

struct ApplyDirectory<'a> {
    dir: &'a str,
    calls: usize,
}

impl MutVisitor for ApplyDirectory<'_> {
    fn enter(&mut self, value: &mut dyn Value) {
        if let Some(setter) = value.directory_setter() {
            setter.set_directory(self.dir);
            self.calls += 1;
        }
    }

    fn field(&mut self, _record: TypeId, _fields: &mut [FieldMut<'_>], _index: usize) -> Step {
        Step::Descend
    }
}
