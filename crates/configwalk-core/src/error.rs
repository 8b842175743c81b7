//! Error types for configwalk
//!
//! Structural errors are programming mistakes in classifier overrides;
//! conformance errors abort a single conformance check.

use std::io;
use std::path::PathBuf;

use configwalk_graph::Kind;

/// Boxed error returned by injected loaders
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for conformance checks
pub type Result<T, E = ConformanceError> = std::result::Result<T, E>;

/// Invalid field override
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Overrides only apply to record types
    #[error("invalid record: {type_name} is a {kind}")]
    NotARecord {
        /// Short type name of the sample value
        type_name: String,
        /// What the type is instead
        kind: Kind,
    },

    /// The record has no such field
    #[error("invalid field: {field:?} not found in {record}")]
    UnknownField {
        /// Requested field name
        field: String,
        /// Short type name of the record
        record: String,
    },
}

/// Fatal failure of a conformance check
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// The working directory could not be determined
    #[error("unexpected error getting absolute path: {}: {source}", path.display())]
    AbsolutePath {
        /// Path as given
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The path does not end in a file name
    #[error("no file name in path: {}", .0.display())]
    NoFileName(PathBuf),

    /// Paths are handed to walkers as strings
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// The injected loader failed
    #[error("unexpected error loading file: {}: {source}", path.display())]
    Load {
        /// Absolute path handed to the loader
        path: PathBuf,
        /// Loader error, verbatim
        #[source]
        source: BoxError,
    },
}

/// Invalid naming convention document
#[derive(Debug, thiserror::Error)]
pub enum ConventionError {
    /// Malformed YAML
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Malformed JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
