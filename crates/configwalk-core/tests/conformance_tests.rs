use std::cell::Cell;
use std::path::Path;

use configwalk_core::{
    assert_graph_eq, test_set_directory, BoxError, Classifier, Collector, ConformanceError,
    FailFast, Reporter,
};
use configwalk_graph::{Config, FieldPath, Value};
use configwalk_test_utils::{
    http_classifier, init_tracing, load_yaml, mismatch, sample_root, slot, standard_classifier,
    BarSetter, FooSetter, HttpClientConfig, IncludeFile, IncludeFiles, Inner, Root,
};
use pretty_assertions::assert_eq;

const FILE: &str = "/data/foo/config.yml";

type Slot = Option<Box<dyn Config>>;

fn graph_eq<C: Value>(reporter: &mut dyn Reporter, want: &C, got: &C) -> bool {
    assert_graph_eq(reporter, want, got)
}

/// Run the check on a graph built fresh by `build` for each load
fn check(build: impl Fn() -> Slot, classifier: &Classifier) -> (bool, Collector) {
    let mut collector = Collector::new();
    let ok = test_set_directory(
        &mut collector,
        FILE,
        |_: &Path| Ok::<_, BoxError>(build()),
        graph_eq::<Slot>,
        classifier,
    )
    .unwrap();
    (ok, collector)
}

#[test]
fn test_conformance_ok() {
    init_tracing();
    let mut loaded = Vec::new();
    let mut collector = Collector::new();
    let ok = test_set_directory(
        &mut collector,
        FILE,
        |_: &Path| {
            let root = sample_root("");
            loaded.push(root.cyclic.clone());
            Ok::<_, BoxError>(root)
        },
        graph_eq::<Root>,
        &standard_classifier(),
    )
    .unwrap();
    for cyclic in loaded.into_iter().flatten() {
        cyclic.borrow_mut().self_ref = None;
    }
    assert_eq!(collector.messages(), Vec::<String>::new());
    assert!(ok);
}

#[test]
fn test_conformance_relative_path() {
    let mut seen = Vec::new();
    let ok = test_set_directory(
        &mut Collector::new(),
        "configs/../config.yml",
        |path: &Path| {
            seen.push(path.to_path_buf());
            Ok::<_, BoxError>(FooSetter::default())
        },
        graph_eq::<FooSetter>,
        &Classifier::default(),
    )
    .unwrap();
    assert!(ok);
    let want = std::env::current_dir().unwrap().join("config.yml");
    assert_eq!(seen, vec![want.clone(), want]);
}

#[test]
fn test_conformance_first_load_error() {
    let mut collector = Collector::new();
    let err = test_set_directory(
        &mut collector,
        FILE,
        |_: &Path| Err::<Root, _>("boom"),
        graph_eq::<Root>,
        &Classifier::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConformanceError::Load { .. }));
    assert_eq!(
        err.to_string(),
        "unexpected error loading file: /data/foo/config.yml: boom"
    );
    assert!(collector.is_clean());
}

#[test]
fn test_conformance_second_load_error() {
    let calls = Cell::new(0);
    let mut collector = Collector::new();
    let err = test_set_directory(
        &mut collector,
        FILE,
        |_: &Path| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Ok(FooSetter::default())
            } else {
                Err("gone")
            }
        },
        graph_eq::<FooSetter>,
        &Classifier::default(),
    )
    .unwrap_err();
    assert_eq!(calls.get(), 2);
    assert_eq!(
        err.to_string(),
        "unexpected error loading file: /data/foo/config.yml: gone"
    );
    assert!(collector.is_clean());
}

#[test]
fn test_conformance_string_not_set() {
    let (ok, collector) = check(
        || {
            slot(FooSetter {
                disable: true,
                ..FooSetter::default()
            })
        },
        &Classifier::default(),
    );
    assert!(!ok);
    assert_eq!(
        collector.into_findings(),
        vec![mismatch(
            FieldPath::root("FooSetter").field("foo_file"),
            "config.yml",
            FILE
        )]
    );
}

#[test]
fn test_conformance_slice_not_set() {
    let (ok, collector) = check(
        || {
            slot(BarSetter {
                disable: true,
                ..BarSetter::default()
            })
        },
        &Classifier::default(),
    );
    assert!(!ok);
    assert_eq!(
        collector.into_findings(),
        vec![mismatch(
            FieldPath::root("BarSetter").field("bar_files").index(0),
            "config.yml",
            FILE
        )]
    );
}

#[test]
fn test_conformance_included_string_not_set() {
    let (ok, collector) = check(
        || {
            slot(IncludeFile {
                extra: String::new(),
                disable: true,
            })
        },
        &standard_classifier(),
    );
    assert!(!ok);
    assert_eq!(
        collector.messages(),
        vec![r#"(IncludeFile).extra = "config.yml"; want: "/data/foo/config.yml""#]
    );
}

#[test]
fn test_conformance_included_slice_not_set() {
    let (ok, collector) = check(
        || {
            slot(IncludeFiles {
                extras: Vec::new(),
                disable: true,
            })
        },
        &standard_classifier(),
    );
    assert!(!ok);
    assert_eq!(
        collector.messages(),
        vec![r#"(IncludeFiles).extras[0] = "config.yml"; want: "/data/foo/config.yml""#]
    );
}

#[test]
fn test_conformance_directory_not_propagated() {
    let (ok, collector) = check(
        || {
            slot(Inner {
                child: slot(FooSetter::default()),
                disable: true,
            })
        },
        &Classifier::default(),
    );
    assert!(!ok);
    assert_eq!(
        collector.messages(),
        vec![
            "unexpected diff:\n  (Inner).child.(FooSetter).foo_file: \
             -\"/data/foo/config.yml\" +\"config.yml\""
                .to_owned(),
            r#"(Inner).child.(FooSetter).foo_file = "config.yml"; want: "/data/foo/config.yml""#
                .to_owned(),
        ]
    );
}

#[test]
#[should_panic(expected = "(FooSetter).foo_file")]
fn test_conformance_fail_fast() {
    let _ = test_set_directory(
        &mut FailFast,
        FILE,
        |_: &Path| {
            Ok::<_, BoxError>(FooSetter {
                disable: true,
                ..FooSetter::default()
            })
        },
        graph_eq::<FooSetter>,
        &Classifier::default(),
    );
}

const HTTP_CONFIG: &str = r"
bearer_token_file: secrets/token
tls_config:
  ca: inline-ca
  ca_file: certs/ca.pem
  cert_file: certs/client.pem
  key_file: certs/client.key
  server_name: example.com
http_headers:
  Authorization:
    files: [headers/auth]
  X-Trace:
    values: [trace-on]
proxy_url: http://proxy:3128
follow_redirects: true
";

#[test]
fn test_conformance_yaml_config() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.yml");
    std::fs::write(&file, HTTP_CONFIG).unwrap();

    let loaded: HttpClientConfig = load_yaml(&file).unwrap();
    assert_eq!(loaded.tls_config.ca_file, "certs/ca.pem");
    assert_eq!(loaded.http_headers["Authorization"].files, vec!["headers/auth"]);

    let mut collector = Collector::new();
    let ok = test_set_directory(
        &mut collector,
        &file,
        load_yaml::<HttpClientConfig>,
        |reporter: &mut dyn Reporter, want: &HttpClientConfig, got: &HttpClientConfig| {
            assert_graph_eq(reporter, want, got)
        },
        &http_classifier(),
    )
    .unwrap();
    assert_eq!(collector.messages(), Vec::<String>::new());
    assert!(ok);
}

#[test]
fn test_conformance_yaml_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.yml");
    std::fs::write(&file, "follow_redirects: [1, 2]\n").unwrap();

    let err = test_set_directory(
        &mut Collector::new(),
        &file,
        load_yaml::<HttpClientConfig>,
        graph_eq::<HttpClientConfig>,
        &http_classifier(),
    )
    .unwrap_err();
    assert!(matches!(err, ConformanceError::Load { .. }));
    assert!(err.to_string().starts_with("unexpected error loading file: "));
}
