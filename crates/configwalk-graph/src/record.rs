//! Record descriptions
//!
//! A record exposes its fields as [`Field`]/[`FieldMut`] views, each carrying
//! a static [`FieldDef`]. The declared [`FieldType`] is decided by type
//! identity, never by the field's current contents.

use std::any::{Any, TypeId};

use crate::secret::Secret;
use crate::value::{type_name_of, Value};

/// Declared type of a record field, as far as classification cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Exactly `String`
    String,
    /// Exactly `Vec<String>`
    StringList,
    /// [`Secret`]
    Secret,
    /// Anything else
    Other,
}

impl FieldType {
    /// Field type of `T`
    #[must_use]
    pub fn of<T: Any>() -> Self {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<String>() {
            Self::String
        } else if id == TypeId::of::<Vec<String>>() {
            Self::StringList
        } else if id == TypeId::of::<Secret>() {
            Self::Secret
        } else {
            Self::Other
        }
    }
}

/// Static description of one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    name: &'static str,
    ty: FieldType,
    exported: bool,
}

impl FieldDef {
    /// Describe a field holding a `T`
    #[inline]
    #[must_use]
    pub fn new<T: Value>(name: &'static str, exported: bool) -> Self {
        Self {
            name,
            ty: FieldType::of::<T>(),
            exported,
        }
    }

    /// Describe a field from a projection, without an instance of `S`
    ///
    /// Used by [`record!`](crate::record) to infer field types.
    #[inline]
    #[must_use]
    pub fn project<S, T, F>(name: &'static str, exported: bool, _projection: F) -> Self
    where
        T: Value,
        F: Fn(&S) -> &T,
    {
        Self::new::<T>(name, exported)
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared field type
    #[inline]
    #[must_use]
    pub fn ty(&self) -> FieldType {
        self.ty
    }

    /// Whether the field is externally settable
    #[inline]
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.exported
    }
}

/// Shared view of one field
pub struct Field<'a> {
    /// Field description
    pub def: FieldDef,
    /// Field value
    pub value: &'a dyn Value,
}

impl<'a> Field<'a> {
    /// Externally settable field
    #[inline]
    pub fn exported<T: Value>(name: &'static str, value: &'a T) -> Self {
        Self {
            def: FieldDef::new::<T>(name, true),
            value,
        }
    }

    /// Field that is not externally settable
    #[inline]
    pub fn hidden<T: Value>(name: &'static str, value: &'a T) -> Self {
        Self {
            def: FieldDef::new::<T>(name, false),
            value,
        }
    }
}

/// Exclusive view of one field
pub struct FieldMut<'a> {
    /// Field description
    pub def: FieldDef,
    /// Field value
    pub value: &'a mut dyn Value,
}

impl<'a> FieldMut<'a> {
    /// Externally settable field
    #[inline]
    pub fn exported<T: Value>(name: &'static str, value: &'a mut T) -> Self {
        Self {
            def: FieldDef::new::<T>(name, true),
            value,
        }
    }

    /// Field that is not externally settable
    #[inline]
    pub fn hidden<T: Value>(name: &'static str, value: &'a mut T) -> Self {
        Self {
            def: FieldDef::new::<T>(name, false),
            value,
        }
    }
}

/// A value with named fields
///
/// Implemented by [`record!`](crate::record).
pub trait Record: Value {
    /// Shared views of all fields, in declaration order
    fn fields(&self) -> Vec<Field<'_>>;

    /// Exclusive views of all fields, in declaration order
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

/// Type-level description of a record: identity, name and fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    id: TypeId,
    name: String,
    fields: Vec<FieldDef>,
}

impl RecordType {
    /// Describe record type `T`
    #[must_use]
    pub fn of<T: Any>(fields: Vec<FieldDef>) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name_of::<T>(),
            fields,
        }
    }

    /// Type identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Short type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All field descriptions
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
