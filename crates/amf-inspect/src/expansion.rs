//! Depth-guarded, one-level-at-a-time expansion.
//!
//! A lazily built node stays collapsed until something asks for its
//! children. The controller then materializes exactly one level, every child
//! again a lazy stub, and clears the node's pending value. Deepening the tree
//! takes a fresh request per level, and requests for nodes deeper than
//! `max_depth` are refused. That is the only protection against cyclic
//! graphs: a self-referencing object can be browsed, but "expand all" stops
//! at the depth limit instead of running until memory is exhausted.
//!
//! Depth is a property of the node's position in the tree, not of the value.
//! The same object reached through two paths gets two depths.

use amf_inspect_core::logging::{span_names, targets};
use amf_inspect_core::PerfSpan;

use crate::builder::{build_lazy, enumerate_children};
use crate::label::mark_unreadable;
use crate::node::DisplayNode;
use crate::settings::{InspectorSettings, DEFAULT_MAX_DEPTH};
use crate::value::Value;

/// Result of one expansion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Children were materialized.
    Expanded {
        /// Number of children installed.
        children: usize,
    },
    /// Nothing was pending: a leaf, or a node that was already expanded.
    NotPending,
    /// The node is deeper than the configured limit; it stays collapsed.
    Refused {
        /// Depth of the refused node.
        depth: usize,
    },
    /// A host policy vetoed the expansion; the node stays collapsed.
    Cancelled,
}

impl ExpandOutcome {
    /// Returns `true` if children were installed by this request.
    pub fn is_expanded(&self) -> bool {
        matches!(self, ExpandOutcome::Expanded { .. })
    }
}

/// One level of materialized children.
#[derive(Debug, Clone)]
pub struct Materialized {
    /// Lazy stubs for every immediate child, at `depth + 1`.
    pub children: Vec<DisplayNode>,
    /// The value could not list its children.
    pub unreadable: bool,
}

/// Applies the depth guard and materializes children on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionController {
    max_depth: usize,
}

impl Default for ExpansionController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ExpansionController {
    /// Creates a controller that refuses nodes deeper than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Creates a controller from settings.
    pub fn from_settings(settings: &InspectorSettings) -> Self {
        Self::new(settings.max_depth)
    }

    /// The configured depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns `true` if a node at `depth` may be expanded.
    pub fn admits(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }

    /// Builds the lazy children of `pending`, owned by a node at `depth`.
    ///
    /// Does not apply the depth guard; callers check [`admits`](Self::admits).
    pub fn materialize(&self, pending: &Value, depth: usize) -> Materialized {
        let list = enumerate_children(pending);
        let children = list
            .entries
            .iter()
            .map(|(name, value)| build_lazy(name, value, depth + 1))
            .collect();
        Materialized {
            children,
            unreadable: list.unreadable.is_some(),
        }
    }

    /// Handles an expansion request for `node`.
    ///
    /// Replaces the placeholder with one level of lazy children and clears
    /// the pending value. Requests for nodes with nothing pending are no-ops;
    /// requests past the depth limit are refused and leave the node as is.
    pub fn expand(&self, node: &mut DisplayNode) -> ExpandOutcome {
        if node.pending.is_none() {
            return ExpandOutcome::NotPending;
        }
        if !self.admits(node.depth) {
            tracing::debug!(
                target: targets::EXPANSION,
                label = %node.label,
                depth = node.depth,
                max_depth = self.max_depth,
                "expansion refused"
            );
            return ExpandOutcome::Refused { depth: node.depth };
        }

        let _span = PerfSpan::new(span_names::EXPAND);
        let Some(pending) = node.pending.take() else {
            return ExpandOutcome::NotPending;
        };
        let materialized = self.materialize(&pending, node.depth);
        if materialized.unreadable {
            node.label = mark_unreadable(&node.label);
        }
        node.children = materialized.children;

        let count = node.children.len();
        tracing::trace!(
            target: targets::EXPANSION,
            label = %node.label,
            depth = node.depth,
            children = count,
            "expanded"
        );
        ExpandOutcome::Expanded { children: count }
    }

    /// Expands `root` and every descendant the depth guard admits.
    ///
    /// Walks the tree with an explicit work list, so the call stack stays
    /// flat however deep the tree gets. Returns the number of nodes expanded.
    pub fn expand_all(&self, root: &mut DisplayNode) -> usize {
        let mut expanded = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.expand(node).is_expanded() {
                expanded += 1;
            }
            stack.extend(node.children.iter_mut().rev());
        }
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DescribeError;
    use crate::node::ExpansionState;
    use crate::value::{Describable, Mapping, Sequence};

    struct Broken;

    impl Describable for Broken {
        fn type_name(&self) -> &str {
            "Broken"
        }

        fn describe(&self) -> Result<Vec<(String, Value)>, DescribeError> {
            Err(DescribeError::new("Broken", "no fields"))
        }
    }

    fn labels(node: &DisplayNode) -> Vec<&str> {
        node.children().iter().map(DisplayNode::label).collect()
    }

    #[test]
    fn test_expand_sequence() {
        let value = Value::Sequence(Sequence::from_values(["a", "b"]));
        let mut node = build_lazy("X", &value, 0);

        let outcome = ExpansionController::default().expand(&mut node);

        assert_eq!(outcome, ExpandOutcome::Expanded { children: 2 });
        assert_eq!(labels(&node), vec!["[0]: a", "[1]: b"]);
        assert_eq!(node.state(), ExpansionState::Expanded);
        assert!(node.children().iter().all(|c| c.depth() == node.depth() + 1));
    }

    #[test]
    fn test_expand_children_are_stubs() {
        let inner = Mapping::from_entries("Inner", [("x", 1)]);
        let outer = Mapping::from_entries("Outer", [("inner", Value::Mapping(inner))]);
        let mut node = build_lazy("root", &Value::Mapping(outer), 0);

        ExpansionController::default().expand(&mut node);

        let child = &node.children()[0];
        assert_eq!(child.label(), "inner: {Inner}");
        assert_eq!(child.state(), ExpansionState::CollapsedPending);
        assert!(child.children()[0].is_placeholder());
    }

    #[test]
    fn test_expand_is_idempotent() {
        let value = Value::Sequence(Sequence::from_values(["a"]));
        let mut node = build_lazy("X", &value, 0);
        let controller = ExpansionController::default();

        controller.expand(&mut node);
        let outcome = controller.expand(&mut node);

        assert_eq!(outcome, ExpandOutcome::NotPending);
        assert_eq!(labels(&node), vec!["[0]: a"]);
    }

    #[test]
    fn test_expand_leaf_is_noop() {
        let mut node = build_lazy("Y", &Value::Null, 0);
        assert_eq!(
            ExpansionController::default().expand(&mut node),
            ExpandOutcome::NotPending
        );
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_expand_empty_mapping() {
        let mut node = build_lazy("", &Value::Mapping(Mapping::new("Foo")), 0);
        assert_eq!(node.label(), ": {Foo}");

        let outcome = ExpansionController::default().expand(&mut node);

        assert_eq!(outcome, ExpandOutcome::Expanded { children: 0 });
        assert_eq!(node.real_children().count(), 0);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_refused_past_limit() {
        let value = Value::Sequence(Sequence::from_values(["a"]));
        let controller = ExpansionController::new(2);

        let mut at_limit = build_lazy("X", &value, 2);
        assert!(controller.expand(&mut at_limit).is_expanded());

        let mut past_limit = build_lazy("X", &value, 3);
        assert_eq!(
            controller.expand(&mut past_limit),
            ExpandOutcome::Refused { depth: 3 }
        );
        assert_eq!(past_limit.state(), ExpansionState::CollapsedPending);
        assert!(past_limit.children()[0].is_placeholder());
    }

    #[test]
    fn test_unreadable_composite_is_annotated() {
        let mut node = build_lazy("Content", &Value::composite(Broken), 0);

        let outcome = ExpansionController::default().expand(&mut node);

        assert_eq!(outcome, ExpandOutcome::Expanded { children: 0 });
        assert_eq!(node.label(), "Content <unreadable>");
        assert!(node.pending().is_none());
    }

    #[test]
    fn test_expand_all_stops_on_cycle() {
        let map = Mapping::new("Loop");
        map.insert("self", Value::Mapping(map.clone()));
        let mut root = build_lazy("root", &Value::Mapping(map.clone()), 0);

        let controller = ExpansionController::new(4);
        let expanded = controller.expand_all(&mut root);

        // Depths 0 through 4 expand; the node at depth 5 is refused.
        assert_eq!(expanded, 5);
        let deepest = root
            .find_path(&["self: {Loop}"; 5])
            .expect("five levels materialized");
        assert_eq!(deepest.depth(), 5);
        assert_eq!(deepest.state(), ExpansionState::CollapsedPending);

        // A second pass has nothing left to do.
        assert_eq!(controller.expand_all(&mut root), 0);
        map.clear();
    }
}
