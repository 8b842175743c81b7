//! Cycle-safe graph walking
//!
//! One skeleton for exclusive walks ([`MutVisitor`]) and one for shared,
//! path-tracking walks ([`Visitor`]). Both descend into every distinct
//! pointer allocation at most once per walk.

use std::any::{Any, TypeId};
use std::collections::HashSet;

use configwalk_graph::{Field, FieldMut, FieldPath, Identity, Node, NodeMut, Value};

/// What the walker does with a field after the visitor has seen it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Leave the field alone
    Skip,
    /// The visitor handled the field itself
    Done,
    /// Walk the field's value as a node of its own
    Descend,
}

/// Strategy of an exclusive walk
pub(crate) trait MutVisitor {
    /// Called once for every node before its children
    fn enter(&mut self, _value: &mut dyn Value) {}

    /// Decide what to do with `fields[index]` of a record of type `record`
    fn field(&mut self, record: TypeId, fields: &mut [FieldMut<'_>], index: usize) -> Step;
}

/// Strategy of a shared walk
pub(crate) trait Visitor {
    /// Decide what to do with `fields[index]` of the record at `path`
    fn field(&mut self, path: &FieldPath, record: TypeId, fields: &[Field<'_>], index: usize)
        -> Step;

    /// Called when the pointee at `path` is mutably borrowed and was skipped
    fn borrowed(&mut self, _path: &FieldPath) {}
}

/// Per-walk counters, logged when a walk finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Stats {
    pub(crate) nodes: usize,
    pub(crate) pointers: usize,
    pub(crate) revisits: usize,
}

/// One top-level walk: visitor, visited set and counters
pub(crate) struct Walker<V> {
    pub(crate) visitor: V,
    visited: HashSet<Identity>,
    pub(crate) stats: Stats,
}

impl<V> Walker<V> {
    pub(crate) fn new(visitor: V) -> Self {
        Self {
            visitor,
            visited: HashSet::new(),
            stats: Stats::default(),
        }
    }

    /// Mark `identity` visited; `false` if it already was
    fn first_visit(&mut self, identity: Identity) -> bool {
        self.stats.pointers += 1;
        if self.visited.insert(identity) {
            tracing::trace!(%identity, "descending into pointee");
            true
        } else {
            self.stats.revisits += 1;
            tracing::trace!(%identity, "pointee already visited");
            false
        }
    }
}

impl<V: MutVisitor> Walker<V> {
    pub(crate) fn walk_mut(&mut self, value: &mut dyn Value) {
        self.stats.nodes += 1;
        self.visitor.enter(value);
        if let Some(inner) = value.inner_mut() {
            self.walk_mut(inner);
            return;
        }
        match value.node_mut() {
            NodeMut::Nil | NodeMut::Scalar => {}
            NodeMut::Pointer(pointer) => {
                if self.first_visit(pointer.identity()) {
                    pointer.with_pointee_mut(&mut |pointee| self.walk_mut(pointee));
                }
            }
            NodeMut::Record(record) => {
                let id = Any::type_id(record.as_any());
                let mut fields = record.fields_mut();
                for index in 0..fields.len() {
                    if self.visitor.field(id, &mut fields, index) == Step::Descend {
                        self.walk_mut(&mut *fields[index].value);
                    }
                }
            }
            NodeMut::Sequence(items) => {
                for item in items {
                    self.walk_mut(item);
                }
            }
            // Keys are immutable; only values can be rewritten.
            NodeMut::Mapping(entries) => {
                for entry in entries {
                    self.walk_mut(entry.value);
                }
            }
            NodeMut::Slot(inner) => self.walk_mut(inner),
        }
    }
}

impl<V: Visitor> Walker<V> {
    pub(crate) fn walk(&mut self, path: &FieldPath, value: &dyn Value) {
        self.stats.nodes += 1;
        match value.node() {
            Node::Nil | Node::Scalar(_) => {}
            Node::Pointer(pointer) => {
                if self.first_visit(pointer.identity())
                    && !pointer.with_pointee(&mut |pointee| self.walk(path, pointee))
                {
                    self.visitor.borrowed(path);
                }
            }
            Node::Record(record) => {
                let id = Any::type_id(record.as_any());
                let fields = record.fields();
                for (index, field) in fields.iter().enumerate() {
                    if self.visitor.field(path, id, &fields, index) == Step::Descend {
                        self.walk(&path.field(field.def.name()), field.value);
                    }
                }
            }
            Node::Sequence(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    self.walk(&path.index(index), item);
                }
            }
            Node::Mapping(entries) => {
                for entry in entries {
                    self.walk(&FieldPath::root(entry.key.type_name()), entry.key);
                    self.walk(&path.key(entry.label), entry.value);
                }
            }
            Node::Slot(inner) => self.walk(&path.concrete(inner.type_name()), inner),
        }
    }
}

/// Unwrap polymorphic slots (and the `Option`s around them) at a root
pub(crate) fn concrete(value: &dyn Value) -> &dyn Value {
    match value.node() {
        Node::Slot(inner) => concrete(inner),
        _ => value,
    }
}

/// Path of a root value: `(ConcreteTypeName)`
pub(crate) fn root_path(value: &dyn Value) -> FieldPath {
    FieldPath::root(value.type_name())
}
