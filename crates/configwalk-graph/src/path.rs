//! Structural paths for diagnostics
//!
//! Provides [`FieldPath`] for describing where a node sits in a value graph.

use std::fmt::{self, Display, Formatter};

/// One step from a node to a child
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Segment {
    /// Record field access: `.name`
    Field(String),
    /// Sequence position: `[3]`
    Index(usize),
    /// Mapping entry: `[key]`
    Key(String),
    /// Polymorphic unwrap: `.(Type)`
    Concrete(String),
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{name}"),
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Key(label) => write!(f, "[{label}]"),
            Self::Concrete(ty) => write!(f, ".({ty})"),
        }
    }
}

/// Path from a root value to a node
///
/// Rendered as `(RootType)` followed by each segment, e.g.
/// `(Root).slice[1].(FooSetter).foo_file`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    root: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Path of a root value of the given type
    #[inline]
    #[must_use]
    pub fn root(type_name: impl Into<String>) -> Self {
        Self {
            root: type_name.into(),
            segments: Vec::new(),
        }
    }

    fn child(&self, segment: Segment) -> Self {
        let mut new = self.clone();
        new.segments.push(segment);
        new
    }

    /// Record field access
    #[inline]
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(Segment::Field(name.into()))
    }

    /// Sequence position
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    /// Mapping entry
    #[inline]
    #[must_use]
    pub fn key(&self, label: impl Into<String>) -> Self {
        self.child(Segment::Key(label.into()))
    }

    /// Polymorphic unwrap to a concrete type
    #[inline]
    #[must_use]
    pub fn concrete(&self, type_name: impl Into<String>) -> Self {
        self.child(Segment::Concrete(type_name.into()))
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.root)?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
