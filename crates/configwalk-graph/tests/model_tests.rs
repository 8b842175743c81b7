use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use configwalk_graph::{
    newtype, record, FieldType, Kind, Node, NodeMut, Reflect, Scalar, Secret, SetDirectory,
    Value,
};
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scrape {
    job_name: String,
    password: Secret,
    password_file: String,
    rule_files: Vec<String>,
    labels: BTreeMap<String, String>,
    interval_secs: u32,
    #[serde(skip)]
    resolved: bool,
}

impl SetDirectory for Scrape {
    fn set_directory(&mut self, _dir: &str) {
        self.resolved = true;
    }
}

record!(Scrape: SetDirectory {
    job_name,
    password,
    password_file,
    rule_files,
    labels,
    interval_secs,
} hidden { resolved });

#[derive(Default)]
struct Jobs(Vec<Scrape>);

newtype!(Jobs(Vec<Scrape>));

const SCRAPE: &str = "
job_name: node
password: hunter2
password_file: pass.txt
rule_files: [a.rules, b.rules]
labels:
  env: prod
interval_secs: 15
";

#[test]
fn test_record_from_yaml() {
    let scrape: Scrape = serde_yaml::from_str(SCRAPE).unwrap();
    let Node::Record(record) = scrape.node() else {
        panic!("expected a record");
    };
    let names: Vec<_> = record.fields().iter().map(|f| f.def.name()).collect();
    assert_eq!(
        names,
        vec![
            "job_name",
            "password",
            "password_file",
            "rule_files",
            "labels",
            "interval_secs",
            "resolved",
        ]
    );

    let fields = record.fields();
    assert!(matches!(fields[1].value.node(), Node::Scalar(Scalar::Secret("hunter2"))));
    assert!(matches!(fields[5].value.node(), Node::Scalar(Scalar::Int(15))));
    match fields[4].value.node() {
        Node::Mapping(entries) => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].label, "env");
        }
        other => panic!("expected a mapping, got {:?}", other.kind()),
    }
}

#[test]
fn test_record_type_describes_fields() {
    let record = Scrape::record_type().unwrap();
    assert_eq!(record.name(), "Scrape");
    let ty = |name| record.field(name).unwrap().ty();
    assert_eq!(ty("job_name"), FieldType::String);
    assert_eq!(ty("password"), FieldType::Secret);
    assert_eq!(ty("rule_files"), FieldType::StringList);
    assert_eq!(ty("labels"), FieldType::Other);
    assert!(!record.field("resolved").unwrap().is_exported());
    assert!(record.field("missing").is_none());
}

#[test]
fn test_record_type_through_pointer() {
    let record = <Option<Rc<RefCell<Scrape>>>>::record_type().unwrap();
    assert_eq!(record.name(), "Scrape");
    assert_eq!(Jobs::record_type().unwrap_err(), Kind::Sequence);
    assert_eq!(<BTreeMap<String, Scrape>>::record_type().unwrap_err(), Kind::Mapping);
}

#[test]
fn test_directory_setter_registration() {
    let mut scrape = Scrape::default();
    scrape
        .directory_setter()
        .expect("registered")
        .set_directory("/etc");
    assert!(scrape.resolved);

    let mut jobs = Jobs(vec![Scrape::default()]);
    assert!(jobs.directory_setter().is_none());
    assert_eq!(jobs.inner_mut().map(|inner| inner.type_name()).as_deref(), Some("Vec<Scrape>"));
    assert!(scrape.inner_mut().is_none());
    match jobs.node_mut() {
        NodeMut::Sequence(items) => assert_eq!(items.len(), 1),
        _ => panic!("expected a sequence"),
    }
}

#[test]
fn test_shared_pointers_share_identity() {
    let shared = Rc::new(RefCell::new(Scrape::default()));
    let alias = Rc::clone(&shared);
    let (Node::Pointer(a), Node::Pointer(b)) = (shared.node(), alias.node()) else {
        panic!("expected pointers");
    };
    assert_eq!(a.identity(), b.identity());

    let other = Rc::new(RefCell::new(Scrape::default()));
    let Node::Pointer(c) = other.node() else {
        panic!("expected a pointer");
    };
    assert_ne!(a.identity(), c.identity());
}

#[test]
fn test_slots_unwrap_to_concrete() {
    let slot: Box<dyn Value> = Box::new(Jobs::default());
    match slot.node() {
        Node::Slot(inner) => assert_eq!(inner.type_name(), "Jobs"),
        _ => panic!("expected a slot"),
    }
    let empty: Option<Box<dyn Value>> = None;
    assert!(empty.node().kind().is_none());
}
