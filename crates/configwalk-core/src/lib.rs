//! Configwalk Core
//!
//! Generic operations over configuration graphs built with
//! [`configwalk_graph`].
//!
//! # Operations
//!
//! - [`set_file`]: Rewrite every file-like field to one path
//! - [`assert_file`]: Report every file-like field that does not hold a path
//! - [`set_directory`]: Apply the directory capability everywhere it is registered
//! - [`test_set_directory`]: Check a root's own directory handling against the
//!   generic walk
//!
//! # Example
//!
//! ```rust
//! use configwalk_core::{assert_file, set_directory, Classifier, Collector};
//! use configwalk_graph::{join_dir, record, SetDirectory};
//!
//! #[derive(Default)]
//! struct Tls {
//!     ca_file: String,
//! }
//!
//! impl SetDirectory for Tls {
//!     fn set_directory(&mut self, dir: &str) {
//!         self.ca_file = join_dir(dir, &self.ca_file);
//!     }
//! }
//!
//! record!(Tls: SetDirectory { ca_file });
//!
//! let mut tls = Tls { ca_file: "ca.pem".into() };
//! set_directory(&mut tls, "/etc/ssl");
//!
//! let mut collector = Collector::new();
//! assert!(assert_file(&mut collector, &tls, "/etc/ssl/ca.pem", &Classifier::default()));
//! ```

mod assertion;
mod classify;
mod conformance;
mod diff;
pub mod error;
mod propagate;
mod report;
mod rewrite;
mod walk;

pub use assertion::assert_file;
pub use classify::{exclude_field, include_field, Classifier, Convention, FieldClass, FieldOption};
pub use conformance::test_set_directory;
pub use diff::{assert_graph_eq, structural_diff};
pub use error::{BoxError, ConformanceError, ConventionError, FieldError};
pub use propagate::set_directory;
pub use report::{Collector, Difference, FailFast, Finding, Reporter};
pub use rewrite::set_file;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
