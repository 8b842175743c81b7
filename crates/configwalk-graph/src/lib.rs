//! Configwalk Graph
//!
//! A uniform, visitable description of configuration object graphs.
//!
//! # Core Concepts
//!
//! - [`Value`]: Anything that can appear in a graph; describes itself as a [`Node`]
//! - [`Record`]: Named fields, registered with [`record!`]
//! - [`Pointer`]: Shared `Rc<RefCell<T>>` references carrying an [`Identity`]
//! - [`SetDirectory`]: The per-type "apply base directory" capability
//! - [`FieldPath`]: Structural path of a node, for diagnostics
//!
//! # Example
//!
//! ```rust
//! use configwalk_graph::{record, Node, Reflect, Value};
//!
//! #[derive(Default)]
//! struct Scrape {
//!     password_file: String,
//!     rule_files: Vec<String>,
//! }
//!
//! record!(Scrape { password_file, rule_files });
//!
//! let scrape = Scrape::default();
//! assert!(matches!(scrape.node(), Node::Record(_)));
//! assert_eq!(scrape.type_name(), "Scrape");
//! ```

mod directory;
mod impls;
mod macros;
mod path;
mod pointer;
mod record;
mod secret;
mod value;

pub use directory::{join_dir, Config, SetDirectory};
pub use path::FieldPath;
pub use pointer::{Identity, Pointer};
pub use record::{Field, FieldDef, FieldMut, FieldType, Record, RecordType};
pub use secret::Secret;
pub use value::{
    short_type_name, type_name_of, Entry, EntryMut, Kind, Node, NodeMut, Reflect, Scalar, Value,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for registering configuration types
pub mod prelude {
    pub use crate::{join_dir, newtype, record, Config, Secret, SetDirectory, Value};
}
