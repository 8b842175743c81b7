//! Structural equality of value graphs
//!
//! The default "assert equal" primitive of the conformance driver.

use std::collections::{HashMap, HashSet};

use configwalk_graph::{FieldPath, Identity, Node, Value};

use crate::report::{Difference, Finding, Reporter};
use crate::walk::{concrete, root_path};

const MISSING: &str = "<missing>";
const BORROWED: &str = "<borrowed>";

/// Every structural difference between `want` and `got`
///
/// Both graphs are walked side by side. Pointer pairs are compared once, so
/// cyclic graphs terminate; mapping entries are matched by key label, so
/// iteration order never matters. Secrets are compared raw but never
/// rendered. A pointee that is mutably borrowed elsewhere cannot be compared
/// and shows up as `<borrowed>`.
#[must_use]
pub fn structural_diff(want: &dyn Value, got: &dyn Value) -> Vec<Difference> {
    let want = concrete(want);
    let got = concrete(got);
    let mut differ = Differ::default();
    differ.compare(&root_path(want), want, got);
    let mut differences = differ.differences;
    differences.sort();
    differences
}

/// Report a [`Finding::Unequal`] if `want` and `got` differ structurally
///
/// Returns `true` if the graphs are equal.
pub fn assert_graph_eq(reporter: &mut dyn Reporter, want: &dyn Value, got: &dyn Value) -> bool {
    let differences = structural_diff(want, got);
    if differences.is_empty() {
        return true;
    }
    tracing::debug!(differences = differences.len(), "graphs differ");
    reporter.report(Finding::Unequal { differences });
    false
}

#[derive(Default)]
struct Differ {
    visited: HashSet<(Identity, Identity)>,
    differences: Vec<Difference>,
}

impl Differ {
    fn push(&mut self, path: &FieldPath, want: String, got: String) {
        self.differences.push(Difference {
            path: path.clone(),
            want,
            got,
        });
    }

    fn compare(&mut self, path: &FieldPath, want: &dyn Value, got: &dyn Value) {
        match (want.node(), got.node()) {
            (Node::Nil, Node::Nil) => {}
            (Node::Scalar(w), Node::Scalar(g)) => {
                if w != g {
                    self.push(path, w.to_string(), g.to_string());
                }
            }
            (Node::Record(w), Node::Record(g)) => {
                if w.type_name() != g.type_name() {
                    self.push(path, w.type_name(), g.type_name());
                    return;
                }
                for (wf, gf) in w.fields().into_iter().zip(g.fields()) {
                    self.compare(&path.field(wf.def.name()), wf.value, gf.value);
                }
            }
            (Node::Sequence(w), Node::Sequence(g)) => {
                for (index, (wi, gi)) in w.iter().zip(&g).enumerate() {
                    self.compare(&path.index(index), *wi, *gi);
                }
                for (index, wi) in w.iter().enumerate().skip(g.len()) {
                    self.push(&path.index(index), describe(&wi.node()), MISSING.to_owned());
                }
                for (index, gi) in g.iter().enumerate().skip(w.len()) {
                    self.push(&path.index(index), MISSING.to_owned(), describe(&gi.node()));
                }
            }
            (Node::Mapping(w), Node::Mapping(g)) => {
                let mut got_by_label: HashMap<&str, &dyn Value> =
                    g.iter().map(|e| (e.label.as_str(), e.value)).collect();
                for entry in &w {
                    let key_path = path.key(entry.label.as_str());
                    match got_by_label.remove(entry.label.as_str()) {
                        Some(value) => self.compare(&key_path, entry.value, value),
                        None => self.push(&key_path, describe(&entry.value.node()), MISSING.to_owned()),
                    }
                }
                for entry in g.iter().filter(|e| got_by_label.contains_key(e.label.as_str())) {
                    self.push(
                        &path.key(entry.label.as_str()),
                        MISSING.to_owned(),
                        describe(&entry.value.node()),
                    );
                }
            }
            (Node::Pointer(w), Node::Pointer(g)) => {
                if !self.visited.insert((w.identity(), g.identity())) {
                    return;
                }
                let mut compared = false;
                let readable = w.with_pointee(&mut |wp| {
                    compared = g.with_pointee(&mut |gp| self.compare(path, wp, gp));
                });
                if !compared {
                    let (want, got) = if readable {
                        (describe(&Node::Pointer(w)), BORROWED.to_owned())
                    } else {
                        (BORROWED.to_owned(), describe(&Node::Pointer(g)))
                    };
                    self.push(path, want, got);
                }
            }
            (Node::Slot(w), Node::Slot(g)) => {
                let (wt, gt) = (w.type_name(), g.type_name());
                if wt == gt {
                    self.compare(&path.concrete(wt), w, g);
                } else {
                    self.push(path, wt, gt);
                }
            }
            (w, g) => self.push(path, describe(&w), describe(&g)),
        }
    }
}

fn describe(node: &Node<'_>) -> String {
    match node {
        Node::Nil => "nil".to_owned(),
        Node::Scalar(scalar) => scalar.to_string(),
        Node::Record(record) => record.type_name(),
        Node::Sequence(items) => format!("[{} items]", items.len()),
        Node::Mapping(entries) => format!("{{{} entries}}", entries.len()),
        Node::Pointer(pointer) => format!("&{}", pointer.identity()),
        Node::Slot(inner) => inner.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use configwalk_graph::{record, Secret};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::report::Collector;

    #[derive(Clone, Default)]
    struct Item {
        name: String,
        token: Secret,
        tags: Vec<String>,
        labels: BTreeMap<String, u32>,
        next: Option<Rc<RefCell<Item>>>,
    }

    record!(Item { name, token, tags, labels, next });

    fn differences(want: &dyn Value, got: &dyn Value) -> Vec<String> {
        structural_diff(want, got).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn equal_graphs() {
        let a = Item {
            name: "a".into(),
            tags: vec!["x".into()],
            ..Item::default()
        };
        assert!(structural_diff(&a, &a.clone()).is_empty());
        let mut collector = Collector::new();
        assert!(assert_graph_eq(&mut collector, &a, &a.clone()));
        assert!(collector.is_clean());
    }

    #[test]
    fn scalar_and_length_differences() {
        let want = Item {
            name: "a".into(),
            tags: vec!["x".into(), "y".into()],
            ..Item::default()
        };
        let got = Item {
            name: "b".into(),
            tags: vec!["x".into()],
            ..Item::default()
        };
        assert_eq!(
            differences(&want, &got),
            vec![
                r#"(Item).name: -"a" +"b""#,
                r#"(Item).tags[1]: -"y" +<missing>"#,
            ]
        );
    }

    #[test]
    fn secrets_compare_raw_render_redacted() {
        let want = Item {
            token: Secret::new("a"),
            ..Item::default()
        };
        let got = Item {
            token: Secret::new("b"),
            ..Item::default()
        };
        assert_eq!(differences(&want, &got), vec!["(Item).token: -<secret> +<secret>"]);
    }

    #[test]
    fn mapping_entries_matched_by_key() {
        let mut want = Item::default();
        want.labels.insert("a".into(), 1);
        want.labels.insert("b".into(), 2);
        let mut got = Item::default();
        got.labels.insert("b".into(), 3);
        got.labels.insert("c".into(), 4);
        assert_eq!(
            differences(&want, &got),
            vec![
                "(Item).labels[a]: -1 +<missing>",
                "(Item).labels[b]: -2 +3",
                "(Item).labels[c]: -<missing> +4",
            ]
        );
    }

    #[test]
    fn cyclic_graphs_terminate() {
        let cycle = |name: &str| {
            let node = Rc::new(RefCell::new(Item {
                name: name.into(),
                ..Item::default()
            }));
            node.borrow_mut().next = Some(Rc::clone(&node));
            node
        };
        let (a, b) = (cycle("x"), cycle("y"));
        assert_eq!(
            differences(&a, &b),
            vec![r#"(Rc<RefCell<Item>>).name: -"x" +"y""#]
        );
        a.borrow_mut().next = None;
        b.borrow_mut().next = None;
    }

    #[test]
    fn nil_against_value() {
        let want = Item::default();
        let got = Item {
            next: Some(Rc::new(RefCell::new(Item::default()))),
            ..Item::default()
        };
        let diff = structural_diff(&want, &got);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].want, "nil");
        assert!(diff[0].got.starts_with('&'));
    }

    #[test]
    fn borrowed_pointee_is_a_difference() {
        let shared = Rc::new(RefCell::new(Item::default()));
        let want = Item {
            next: Some(Rc::clone(&shared)),
            ..Item::default()
        };
        let got = Item {
            next: Some(Rc::new(RefCell::new(Item::default()))),
            ..Item::default()
        };
        let guard = shared.borrow_mut();
        let diff = structural_diff(&want, &got);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].path.to_string(), "(Item).next");
        assert_eq!(diff[0].want, "<borrowed>");
        assert!(diff[0].got.starts_with('&'));

        let diff = structural_diff(&got, &want);
        assert_eq!(diff.len(), 1);
        assert!(diff[0].want.starts_with('&'));
        assert_eq!(diff[0].got, "<borrowed>");
        drop(guard);

        assert!(structural_diff(&want, &got).is_empty());
    }

    #[test]
    fn slots_compare_concrete_types() {
        let want: Box<dyn Value> = Box::new(String::from("a"));
        let got: Box<dyn Value> = Box::new(7_u8);
        assert_eq!(differences(&want, &got), vec!["(String): -\"a\" +7"]);
    }

    #[test]
    fn unequal_is_reported_once() {
        let mut collector = Collector::new();
        let want = Item {
            name: "a".into(),
            ..Item::default()
        };
        assert!(!assert_graph_eq(&mut collector, &want, &Item::default()));
        assert_eq!(collector.findings().len(), 1);
        assert!(collector.messages()[0].starts_with("unexpected diff:"));
    }
}
