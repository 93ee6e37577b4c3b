//! Eager and lazy tree materialization.
//!
//! Both entry points classify the value and render its label the same way;
//! they differ only in when container children are produced:
//!
//! - [`build_eager`] recurses into every child immediately. Use it for data
//!   that is known to be small and acyclic, such as message headers. It does
//!   not terminate on cyclic graphs.
//! - [`build_lazy`] stops after one level: containers get a single
//!   placeholder child and keep the value as their pending child source.
//!   Expanding such a node is the job of
//!   [`ExpansionController`](crate::expansion::ExpansionController).
//!
//! [`enumerate_children`] is the shared child rule: map entries in insertion
//! order, sequence elements as `[i]`, composite fields in the order the type
//! describes them.

use amf_inspect_core::logging::{span_names, targets};
use amf_inspect_core::PerfSpan;

use crate::classify::{classify, Shape};
use crate::error::DescribeError;
use crate::label::{index_name, mark_unreadable, render};
use crate::node::DisplayNode;
use crate::value::Value;

/// The immediate children of one value.
#[derive(Debug, Clone, Default)]
pub struct ChildList {
    /// `(name, value)` pairs in display order.
    pub entries: Vec<(String, Value)>,
    /// Set when a composite failed to describe itself; `entries` is then empty.
    pub unreadable: Option<DescribeError>,
}

impl ChildList {
    /// Number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lists the immediate named children of `value` without recursing.
///
/// Leaf shapes yield an empty list. A composite whose `describe` fails
/// yields an empty list with `unreadable` set; the error never propagates.
pub fn enumerate_children(value: &Value) -> ChildList {
    match value {
        Value::Mapping(map) => ChildList {
            entries: map.entries(),
            unreadable: None,
        },
        Value::Sequence(seq) => ChildList {
            entries: seq
                .elements()
                .into_iter()
                .enumerate()
                .map(|(i, element)| (index_name(i), element))
                .collect(),
            unreadable: None,
        },
        Value::Composite(object) => match object.describe() {
            Ok(entries) => ChildList {
                entries,
                unreadable: None,
            },
            Err(err) => {
                tracing::warn!(target: targets::BUILDER, type_name = object.type_name(), "{}", err);
                ChildList {
                    entries: Vec::new(),
                    unreadable: Some(err),
                }
            }
        },
        _ => ChildList::default(),
    }
}

/// Builds a fully populated subtree for `value`.
///
/// No depth limit is enforced here.
pub fn build_eager(name: &str, value: &Value, depth: usize) -> DisplayNode {
    let _span = PerfSpan::new(span_names::BUILD_EAGER);
    build_eager_inner(name, value, depth)
}

fn build_eager_inner(name: &str, value: &Value, depth: usize) -> DisplayNode {
    let shape = classify(value);
    let label = render(name, shape, value);
    if !shape.is_container() {
        return DisplayNode::leaf(name, label, depth);
    }

    let children = enumerate_children(value);
    let label = if children.unreadable.is_some() {
        mark_unreadable(&label)
    } else {
        label
    };
    let nodes = children
        .entries
        .iter()
        .map(|(child_name, child)| build_eager_inner(child_name, child, depth + 1))
        .collect();
    DisplayNode::expanded(name, label, depth, nodes)
}

/// Builds a one-level stub for `value`.
///
/// Containers get exactly one placeholder child and keep a handle to
/// `value` for later expansion; their fields are not inspected. Other shapes
/// produce the same leaf [`build_eager`] would.
pub fn build_lazy(name: &str, value: &Value, depth: usize) -> DisplayNode {
    let shape = classify(value);
    let label = render(name, shape, value);
    tracing::trace!(target: targets::BUILDER, name, depth, ?shape, "lazy node");
    match shape {
        Shape::Mapping | Shape::Sequence | Shape::Composite => {
            DisplayNode::stub(name, label, depth, value.clone())
        }
        Shape::Absent | Shape::Text | Shape::OpaqueBlob | Shape::Primitive => {
            DisplayNode::leaf(name, label, depth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ExpansionState;
    use crate::value::{Describable, Mapping, Sequence, UnknownObject};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counted {
        calls: Arc<AtomicUsize>,
    }

    impl Describable for Counted {
        fn type_name(&self) -> &str {
            "Counted"
        }

        fn describe(&self) -> Result<Vec<(String, Value)>, DescribeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![("inner".to_string(), Value::from(1))])
        }
    }

    struct Broken;

    impl Describable for Broken {
        fn type_name(&self) -> &str {
            "Broken"
        }

        fn describe(&self) -> Result<Vec<(String, Value)>, DescribeError> {
            Err(DescribeError::new("Broken", "field getter failed"))
        }
    }

    fn labels(node: &DisplayNode) -> Vec<&str> {
        node.children().iter().map(DisplayNode::label).collect()
    }

    #[test]
    fn test_enumerate_mapping_in_insertion_order() {
        let map = Mapping::from_entries("Foo", [("z", 1), ("a", 2)]);
        let children = enumerate_children(&Value::Mapping(map));
        let names: Vec<&str> = children.entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_enumerate_sequence_names_by_index() {
        let seq = Sequence::from_values(["a", "b", "c"]);
        let children = enumerate_children(&Value::Sequence(seq));
        let names: Vec<&str> = children.entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["[0]", "[1]", "[2]"]);
    }

    #[test]
    fn test_enumerate_leaf_shapes_is_empty() {
        assert!(enumerate_children(&Value::Null).is_empty());
        assert!(enumerate_children(&Value::text("x")).is_empty());
        assert!(enumerate_children(&Value::from(1.0)).is_empty());
    }

    #[test]
    fn test_enumerate_unknown_composite_is_empty() {
        let children = enumerate_children(&Value::composite(UnknownObject::new("Mystery")));
        assert!(children.is_empty());
        assert!(children.unreadable.is_none());
    }

    #[test]
    fn test_enumerate_broken_composite_is_caught() {
        let children = enumerate_children(&Value::composite(Broken));
        assert!(children.is_empty());
        assert_eq!(
            children.unreadable.map(|e| e.type_name),
            Some("Broken".to_string())
        );
    }

    #[test]
    fn test_build_eager_sequence() {
        let value = Value::Sequence(Sequence::from_values(["a", "b"]));
        let node = build_eager("X", &value, 0);

        assert_eq!(node.label(), "X: [2]");
        assert_eq!(labels(&node), vec!["[0]: a", "[1]: b"]);
        assert_eq!(node.state(), ExpansionState::Expanded);
        assert!(node.children().iter().all(|c| c.depth() == 1));
    }

    #[test]
    fn test_build_eager_nested() {
        let inner = Mapping::from_entries("Inner", [("flag", true)]);
        let outer = Mapping::from_entries("Outer", [("inner", Value::Mapping(inner))]);
        let node = build_eager("root", &Value::Mapping(outer), 0);

        let flag = node
            .find_path(&["inner: {Inner}", "flag: true"])
            .expect("nested node");
        assert_eq!(flag.depth(), 2);
        assert_eq!(flag.state(), ExpansionState::Leaf);
    }

    #[test]
    fn test_build_eager_marks_unreadable() {
        let node = build_eager("obj", &Value::composite(Broken), 0);
        assert_eq!(node.label(), "obj <unreadable>");
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_build_lazy_never_describes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let value = Value::composite(Counted {
            calls: calls.clone(),
        });

        let node = build_lazy("obj", &value, 3);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(node.label(), "obj");
        assert_eq!(node.depth(), 3);
        assert_eq!(node.children().len(), 1);
        assert!(node.children()[0].is_placeholder());
        assert!(node.pending().is_some());
    }

    #[test]
    fn test_build_lazy_null_has_no_placeholder() {
        let node = build_lazy("Y", &Value::Null, 0);
        assert_eq!(node.label(), "Y: null");
        assert!(node.children().is_empty());
        assert!(node.pending().is_none());
        assert_eq!(node.state(), ExpansionState::Leaf);
    }

    #[test]
    fn test_build_lazy_on_self_reference_returns() {
        let map = Mapping::new("Loop");
        map.insert("self", Value::Mapping(map.clone()));

        let node = build_lazy("root", &Value::Mapping(map.clone()), 0);
        assert_eq!(node.label(), "root: {Loop}");
        assert_eq!(node.state(), ExpansionState::CollapsedPending);
        map.clear();
    }

    #[test]
    fn test_labels_match_between_modes() {
        let map = Mapping::from_entries("Foo", [("a", Value::from("x")), ("b", Value::Null)]);
        let value = Value::Mapping(map);
        assert_eq!(build_eager("n", &value, 0).label(), build_lazy("n", &value, 0).label());
    }
}
