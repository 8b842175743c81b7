//! Testing utilities for configwalk workspace
//!
//! Shared fixtures, loaders, and assertions.

#![allow(missing_docs)]

use std::path::Path;

use anyhow::Context;
use configwalk_core::Finding;
use configwalk_graph::FieldPath;
use serde::de::DeserializeOwned;

pub mod fixtures;
pub mod http;

pub use fixtures::*;
pub use http::{http_classifier, Header, HttpClientConfig, TlsConfig};

/// Install a test-friendly tracing subscriber, honouring `RUST_LOG`
///
/// Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Load a YAML document from `path`
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&source).with_context(|| format!("parsing {}", path.display()))
}

/// A file mismatch finding at `path`
pub fn mismatch(path: FieldPath, got: &str, want: &str) -> Finding {
    Finding::FileMismatch {
        path,
        got: got.to_owned(),
        want: want.to_owned(),
    }
}

/// Assert two finding collections hold the same elements, in any order
pub fn assert_findings_eq(got: &[Finding], want: &[Finding]) {
    let mut got = got.to_vec();
    let mut want = want.to_vec();
    got.sort();
    want.sort();
    pretty_assertions::assert_eq!(got, want);
}
