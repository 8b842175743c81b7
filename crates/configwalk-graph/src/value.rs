//! The [`Value`] trait and the closed set of node kinds
//!
//! Every value reachable from a configuration root describes itself as one
//! [`Node`] (shared view) or [`NodeMut`] (exclusive view). Walkers dispatch on
//! these variants only; they never see concrete configuration types.

use std::any::Any;
use std::fmt::{self, Display, Formatter};

use crate::directory::SetDirectory;
use crate::pointer::Pointer;
use crate::record::{Record, RecordType};

/// Kind of a type in a value graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Atomic leaf (string, boolean, number, secret)
    Scalar,
    /// Named fields
    Record,
    /// Indexed children
    Sequence,
    /// Key/value pairs
    Mapping,
    /// Shared reference with identity
    Pointer,
    /// Polymorphic slot holding one concrete value
    Slot,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar => "scalar",
            Self::Record => "record",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Pointer => "pointer",
            Self::Slot => "slot",
        })
    }
}

/// Scalar leaf payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// Plain string
    Str(&'a str),
    /// Secret string; compared raw, never rendered
    Secret(&'a str),
    /// Boolean
    Bool(bool),
    /// Any integer primitive
    Int(i128),
    /// Any float primitive
    Float(f64),
    /// Character
    Char(char),
}

impl Display for Scalar<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Secret(_) => f.write_str("<secret>"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Char(c) => write!(f, "{c:?}"),
        }
    }
}

/// Shared view of one mapping entry
pub struct Entry<'a> {
    /// Key rendered for diagnostics
    pub label: String,
    /// Key as a node of its own
    pub key: &'a dyn Value,
    /// Value node
    pub value: &'a dyn Value,
}

impl<'a> Entry<'a> {
    /// Build an entry from a displayable key
    pub fn new<K: Value + Display>(key: &'a K, value: &'a dyn Value) -> Self {
        Self {
            label: key.to_string(),
            key,
            value,
        }
    }
}

/// Exclusive view of one mapping entry
///
/// Keys stay shared: maps never hand out mutable access to their keys.
pub struct EntryMut<'a> {
    /// Key rendered for diagnostics
    pub label: String,
    /// Key as a node of its own
    pub key: &'a dyn Value,
    /// Value node
    pub value: &'a mut dyn Value,
}

impl<'a> EntryMut<'a> {
    /// Build an entry from a displayable key
    pub fn new<K: Value + Display>(key: &'a K, value: &'a mut dyn Value) -> Self {
        Self {
            label: key.to_string(),
            key,
            value,
        }
    }
}

/// Shared view of a node
pub enum Node<'a> {
    /// Empty reference or empty slot
    Nil,
    /// Atomic leaf
    Scalar(Scalar<'a>),
    /// Record with named fields
    Record(&'a dyn Record),
    /// Ordered children
    Sequence(Vec<&'a dyn Value>),
    /// Unordered key/value children
    Mapping(Vec<Entry<'a>>),
    /// Shared reference
    Pointer(&'a dyn Pointer),
    /// Polymorphic slot, already unwrapped to its concrete value
    Slot(&'a dyn Value),
}

/// Exclusive view of a node
pub enum NodeMut<'a> {
    /// Empty reference or empty slot
    Nil,
    /// Atomic leaf
    Scalar,
    /// Record with named fields
    Record(&'a mut dyn Record),
    /// Ordered children
    Sequence(Vec<&'a mut dyn Value>),
    /// Unordered key/value children
    Mapping(Vec<EntryMut<'a>>),
    /// Shared reference
    Pointer(&'a mut dyn Pointer),
    /// Polymorphic slot, already unwrapped to its concrete value
    Slot(&'a mut dyn Value),
}

impl Node<'_> {
    /// Kind of this node, `None` for [`Node::Nil`]
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Self::Nil => None,
            Self::Scalar(_) => Some(Kind::Scalar),
            Self::Record(_) => Some(Kind::Record),
            Self::Sequence(_) => Some(Kind::Sequence),
            Self::Mapping(_) => Some(Kind::Mapping),
            Self::Pointer(_) => Some(Kind::Pointer),
            Self::Slot(_) => Some(Kind::Slot),
        }
    }
}

/// Type-erasure helpers implemented for every [`Value`]
///
/// Blanket-implemented; never implement this by hand.
pub trait Reflect: Any {
    /// Upcast to [`Any`] for downcasting to a concrete field type
    fn as_any(&self) -> &dyn Any;

    /// Mutable variant of [`Reflect::as_any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Upcast any `Value` sub-trait object to `dyn Value`
    fn as_value(&self) -> &dyn Value;

    /// Mutable variant of [`Reflect::as_value`]
    fn as_value_mut(&mut self) -> &mut dyn Value;

    /// Concrete type name without module paths
    fn type_name(&self) -> String;
}

impl<T: Value> Reflect for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn as_value(&self) -> &dyn Value {
        self
    }

    #[inline]
    fn as_value_mut(&mut self) -> &mut dyn Value {
        self
    }

    fn type_name(&self) -> String {
        type_name_of::<T>()
    }
}

/// A value that can take part in a value graph
///
/// Records implement this through [`record!`](crate::record), single-field
/// wrappers through [`newtype!`](crate::newtype); the standard containers and
/// primitives are registered by this crate.
pub trait Value: Reflect {
    /// Shared view of this value
    fn node(&self) -> Node<'_>;

    /// Exclusive view of this value
    fn node_mut(&mut self) -> NodeMut<'_>;

    /// The directory capability, when this value registers one
    fn directory_setter(&mut self) -> Option<&mut dyn SetDirectory> {
        None
    }

    /// The value this one is a transparent layer over
    ///
    /// Exclusive walks enter both this value and the returned one, so each
    /// gets its own [`Value::directory_setter`] call.
    fn inner_mut(&mut self) -> Option<&mut dyn Value> {
        None
    }

    /// Record description of this type, looking through pointer indirection
    ///
    /// # Errors
    /// Returns the type's [`Kind`] when it is not a record
    fn record_type() -> Result<RecordType, Kind>
    where
        Self: Sized;
}

/// Short type name of `T` (module paths stripped)
#[must_use]
pub fn type_name_of<T: ?Sized>() -> String {
    short_type_name(std::any::type_name::<T>())
}

/// Strip module paths from every segment of a fully qualified type name
///
/// `alloc::rc::Rc<core::cell::RefCell<my::Foo>>` becomes `Rc<RefCell<Foo>>`.
#[must_use]
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else {
            out.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                segment_start = out.len();
            }
        }
    }
    out
}
