//! Registrations for standard library types

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;

use crate::directory::Config;
use crate::record::RecordType;
use crate::secret::Secret;
use crate::value::{Entry, EntryMut, Kind, Node, NodeMut, Scalar, Value};

macro_rules! scalar {
    ($($ty:ty => |$v:ident| $scalar:expr),* $(,)?) => {$(
        impl Value for $ty {
            #[inline]
            fn node(&self) -> Node<'_> {
                let $v = self;
                Node::Scalar($scalar)
            }

            #[inline]
            fn node_mut(&mut self) -> NodeMut<'_> {
                NodeMut::Scalar
            }

            fn record_type() -> Result<RecordType, Kind> {
                Err(Kind::Scalar)
            }
        }
    )*};
}

scalar! {
    String => |v| Scalar::Str(v.as_str()),
    &'static str => |v| Scalar::Str(v),
    Secret => |v| Scalar::Secret(v.expose()),
    bool => |v| Scalar::Bool(*v),
    char => |v| Scalar::Char(*v),
    i8 => |v| Scalar::Int(i128::from(*v)),
    i16 => |v| Scalar::Int(i128::from(*v)),
    i32 => |v| Scalar::Int(i128::from(*v)),
    i64 => |v| Scalar::Int(i128::from(*v)),
    isize => |v| Scalar::Int(*v as i128),
    u8 => |v| Scalar::Int(i128::from(*v)),
    u16 => |v| Scalar::Int(i128::from(*v)),
    u32 => |v| Scalar::Int(i128::from(*v)),
    u64 => |v| Scalar::Int(i128::from(*v)),
    usize => |v| Scalar::Int(*v as i128),
    f32 => |v| Scalar::Float(f64::from(*v)),
    f64 => |v| Scalar::Float(*v),
}

// Nullable, otherwise transparent.
impl<T: Value> Value for Option<T> {
    fn node(&self) -> Node<'_> {
        match self {
            Some(inner) => inner.node(),
            None => Node::Nil,
        }
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        match self {
            Some(inner) => inner.node_mut(),
            None => NodeMut::Nil,
        }
    }

    fn inner_mut(&mut self) -> Option<&mut dyn Value> {
        self.as_mut().map(|inner| inner as &mut dyn Value)
    }

    fn record_type() -> Result<RecordType, Kind> {
        T::record_type()
    }
}

macro_rules! sequence {
    ($($ty:ty $(, const $n:ident: usize)?);* $(;)?) => {$(
        impl<T: Value $(, const $n: usize)?> Value for $ty {
            fn node(&self) -> Node<'_> {
                Node::Sequence(self.iter().map(|v| v as &dyn Value).collect())
            }

            fn node_mut(&mut self) -> NodeMut<'_> {
                NodeMut::Sequence(self.iter_mut().map(|v| v as &mut dyn Value).collect())
            }

            fn record_type() -> Result<RecordType, Kind> {
                Err(Kind::Sequence)
            }
        }
    )*};
}

sequence! {
    Vec<T>;
    VecDeque<T>;
    [T; N], const N: usize;
}

impl<K, V> Value for BTreeMap<K, V>
where
    K: Value + Display + Ord,
    V: Value,
{
    fn node(&self) -> Node<'_> {
        Node::Mapping(self.iter().map(|(k, v)| Entry::new(k, v)).collect())
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Mapping(self.iter_mut().map(|(k, v)| EntryMut::new(k, v)).collect())
    }

    fn record_type() -> Result<RecordType, Kind> {
        Err(Kind::Mapping)
    }
}

impl<K, V, S> Value for HashMap<K, V, S>
where
    K: Value + Display + Eq + Hash,
    V: Value,
    S: BuildHasher + 'static,
{
    fn node(&self) -> Node<'_> {
        Node::Mapping(self.iter().map(|(k, v)| Entry::new(k, v)).collect())
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Mapping(self.iter_mut().map(|(k, v)| EntryMut::new(k, v)).collect())
    }

    fn record_type() -> Result<RecordType, Kind> {
        Err(Kind::Mapping)
    }
}

impl<K, V, S> Value for IndexMap<K, V, S>
where
    K: Value + Display + Eq + Hash,
    V: Value,
    S: BuildHasher + 'static,
{
    fn node(&self) -> Node<'_> {
        Node::Mapping(self.iter().map(|(k, v)| Entry::new(k, v)).collect())
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Mapping(self.iter_mut().map(|(k, v)| EntryMut::new(k, v)).collect())
    }

    fn record_type() -> Result<RecordType, Kind> {
        Err(Kind::Mapping)
    }
}

impl Value for Box<dyn Value> {
    #[inline]
    fn node(&self) -> Node<'_> {
        Node::Slot(&**self)
    }

    #[inline]
    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Slot(&mut **self)
    }

    fn record_type() -> Result<RecordType, Kind> {
        Err(Kind::Slot)
    }
}

impl Value for Box<dyn Config> {
    #[inline]
    fn node(&self) -> Node<'_> {
        Node::Slot((**self).as_value())
    }

    #[inline]
    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Slot((**self).as_value_mut())
    }

    fn record_type() -> Result<RecordType, Kind> {
        Err(Kind::Slot)
    }
}
