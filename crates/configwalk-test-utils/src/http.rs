//! A serde-loadable client configuration
//!
//! Shaped like a typical HTTP client block: inline secrets next to their
//! `*_file` counterparts, a nested TLS record and a header map.

use std::collections::BTreeMap;

use configwalk_core::{include_field, Classifier};
use configwalk_graph::{join_dir, record, Secret, SetDirectory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub bearer_token: Secret,
    pub bearer_token_file: String,
    pub tls_config: TlsConfig,
    pub http_headers: BTreeMap<String, Header>,
    pub proxy_url: String,
    pub follow_redirects: bool,
}

impl SetDirectory for HttpClientConfig {
    fn set_directory(&mut self, dir: &str) {
        self.bearer_token_file = join_dir(dir, &self.bearer_token_file);
        self.tls_config.set_directory(dir);
        for header in self.http_headers.values_mut() {
            header.set_directory(dir);
        }
    }
}

record!(HttpClientConfig: SetDirectory {
    bearer_token,
    bearer_token_file,
    tls_config,
    http_headers,
    proxy_url,
    follow_redirects,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub ca: String,
    pub ca_file: String,
    pub cert: String,
    pub cert_file: String,
    pub key: Secret,
    pub key_file: String,
    pub server_name: String,
    pub insecure_skip_verify: bool,
}

impl SetDirectory for TlsConfig {
    fn set_directory(&mut self, dir: &str) {
        self.ca_file = join_dir(dir, &self.ca_file);
        self.cert_file = join_dir(dir, &self.cert_file);
        self.key_file = join_dir(dir, &self.key_file);
    }
}

record!(TlsConfig: SetDirectory {
    ca,
    ca_file,
    cert,
    cert_file,
    key,
    key_file,
    server_name,
    insecure_skip_verify,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub values: Vec<String>,
    pub secrets: Vec<Secret>,
    pub files: Vec<String>,
}

impl SetDirectory for Header {
    fn set_directory(&mut self, dir: &str) {
        for file in &mut self.files {
            *file = join_dir(dir, file);
        }
    }
}

record!(Header: SetDirectory { values, secrets, files });

/// `Header.files` holds paths without following the naming convention
pub fn http_classifier() -> Classifier {
    Classifier::default()
        .with_option(include_field(&Header::default(), "files").expect("Header has files"))
}
