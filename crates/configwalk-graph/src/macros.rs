//! Registration macros
//!
//! These map a concrete configuration type onto the generic node
//! description once, so walkers never need to know about it.

/// Register a struct as a record node
///
/// ```
/// use configwalk_graph::{join_dir, record, SetDirectory, Value};
///
/// #[derive(Default)]
/// struct TlsConfig {
///     ca_file: String,
///     server_name: String,
///     cache: Vec<u8>,
/// }
///
/// impl SetDirectory for TlsConfig {
///     fn set_directory(&mut self, dir: &str) {
///         self.ca_file = join_dir(dir, &self.ca_file);
///     }
/// }
///
/// record!(TlsConfig: SetDirectory { ca_file, server_name } hidden { cache });
///
/// let record = TlsConfig::record_type().unwrap();
/// assert_eq!(record.fields().len(), 3);
/// assert!(!record.field("cache").unwrap().is_exported());
/// ```
///
/// Fields listed under `hidden` are not externally settable: rewriting and
/// assertion skip them, directory propagation still descends into them.
/// Fields not listed at all are invisible to every walker.
#[macro_export]
macro_rules! record {
    (@setter yes) => {
        fn directory_setter(&mut self) -> ::std::option::Option<&mut dyn $crate::SetDirectory> {
            ::std::option::Option::Some(self)
        }
    };
    (@setter no) => {};
    (@impl $ty:ident, $setter:ident, { $($field:ident),* $(,)? } $(hidden { $($hidden:ident),* $(,)? })?) => {
        impl $crate::Record for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $($crate::Field::exported(::std::stringify!($field), &self.$field),)*
                    $($($crate::Field::hidden(::std::stringify!($hidden), &self.$hidden),)*)?
                ]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<$crate::FieldMut<'_>> {
                ::std::vec![
                    $($crate::FieldMut::exported(::std::stringify!($field), &mut self.$field),)*
                    $($($crate::FieldMut::hidden(::std::stringify!($hidden), &mut self.$hidden),)*)?
                ]
            }
        }

        impl $crate::Value for $ty {
            fn node(&self) -> $crate::Node<'_> {
                $crate::Node::Record(self)
            }

            fn node_mut(&mut self) -> $crate::NodeMut<'_> {
                $crate::NodeMut::Record(self)
            }

            $crate::record!(@setter $setter);

            fn record_type() -> ::std::result::Result<$crate::RecordType, $crate::Kind> {
                ::std::result::Result::Ok($crate::RecordType::of::<$ty>(::std::vec![
                    $($crate::FieldDef::project(::std::stringify!($field), true, |s: &$ty| &s.$field),)*
                    $($($crate::FieldDef::project(::std::stringify!($hidden), false, |s: &$ty| &s.$hidden),)*)?
                ]))
            }
        }
    };
    ($ty:ident : SetDirectory { $($body:tt)* } $($rest:tt)*) => {
        $crate::record!(@impl $ty, yes, { $($body)* } $($rest)*);
    };
    ($ty:ident { $($body:tt)* } $($rest:tt)*) => {
        $crate::record!(@impl $ty, no, { $($body)* } $($rest)*);
    };
}

/// Register a single-field tuple struct as its inner value
///
/// The wrapper is structurally its inner value but may carry its own
/// directory capability:
///
/// ```
/// use std::collections::BTreeMap;
/// use configwalk_graph::{newtype, SetDirectory};
///
/// #[derive(Default)]
/// struct Targets(BTreeMap<String, String>);
///
/// impl SetDirectory for Targets {
///     fn set_directory(&mut self, _dir: &str) {}
/// }
///
/// newtype!(Targets(BTreeMap<String, String>): SetDirectory);
/// ```
#[macro_export]
macro_rules! newtype {
    (@impl $ty:ident, $inner:ty, $setter:ident) => {
        impl $crate::Value for $ty {
            fn node(&self) -> $crate::Node<'_> {
                $crate::Value::node(&self.0)
            }

            fn node_mut(&mut self) -> $crate::NodeMut<'_> {
                $crate::Value::node_mut(&mut self.0)
            }

            $crate::record!(@setter $setter);

            fn inner_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::Value> {
                ::std::option::Option::Some(&mut self.0)
            }

            fn record_type() -> ::std::result::Result<$crate::RecordType, $crate::Kind> {
                <$inner as $crate::Value>::record_type()
            }
        }
    };
    ($ty:ident ( $inner:ty ) : SetDirectory) => {
        $crate::newtype!(@impl $ty, $inner, yes);
    };
    ($ty:ident ( $inner:ty )) => {
        $crate::newtype!(@impl $ty, $inner, no);
    };
}
