//! Materialized display nodes.

use crate::value::Value;

/// Label of the synthetic child that makes a lazy node look expandable.
pub const PLACEHOLDER_LABEL: &str = "...";

/// Expansion state of a [`DisplayNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpansionState {
    /// The node never has children (text, primitives, null, blobs, placeholders).
    Leaf,
    /// Children are deferred; only a placeholder child is present.
    CollapsedPending,
    /// Children are materialized. Terminal.
    Expanded,
}

/// A presentation-layer tree node.
///
/// Built by [`crate::builder`]; a host adapter turns it into whatever its
/// toolkit displays. A node holding a pending value has not materialized its
/// children yet: its only child is a placeholder.
#[derive(Debug, Clone)]
pub struct DisplayNode {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) children: Vec<DisplayNode>,
    pub(crate) pending: Option<Value>,
    pub(crate) depth: usize,
    pub(crate) container: bool,
    pub(crate) placeholder: bool,
}

impl DisplayNode {
    /// A childless node.
    pub fn leaf(name: impl Into<String>, label: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            children: Vec::new(),
            pending: None,
            depth,
            container: false,
            placeholder: false,
        }
    }

    /// A container whose children are already materialized.
    pub(crate) fn expanded(
        name: impl Into<String>,
        label: impl Into<String>,
        depth: usize,
        children: Vec<DisplayNode>,
    ) -> Self {
        Self {
            children,
            container: true,
            ..Self::leaf(name, label, depth)
        }
    }

    /// A container stub: one placeholder child and the value to expand later.
    pub(crate) fn stub(
        name: impl Into<String>,
        label: impl Into<String>,
        depth: usize,
        pending: Value,
    ) -> Self {
        Self {
            children: vec![Self::placeholder(depth + 1)],
            pending: Some(pending),
            container: true,
            ..Self::leaf(name, label, depth)
        }
    }

    /// The synthetic "..." child of a stub.
    pub(crate) fn placeholder(depth: usize) -> Self {
        Self {
            placeholder: true,
            ..Self::leaf("", PLACEHOLDER_LABEL, depth)
        }
    }

    /// The name this node was built under (map key, field name or `[i]`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full one-line label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Child nodes, in display order.
    pub fn children(&self) -> &[DisplayNode] {
        &self.children
    }

    /// The deferred value, if children have not been materialized yet.
    pub fn pending(&self) -> Option<&Value> {
        self.pending.as_ref()
    }

    /// Number of expansion steps from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` for the synthetic child of a stub.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Current expansion state.
    pub fn state(&self) -> ExpansionState {
        if self.pending.is_some() {
            ExpansionState::CollapsedPending
        } else if self.container {
            ExpansionState::Expanded
        } else {
            ExpansionState::Leaf
        }
    }

    /// Children that are not placeholders.
    pub fn real_children(&self) -> impl Iterator<Item = &DisplayNode> {
        self.children.iter().filter(|child| !child.placeholder)
    }

    /// Follows child labels from this node. Returns `None` if any step is missing.
    pub fn find_path(&self, labels: &[&str]) -> Option<&DisplayNode> {
        labels.iter().try_fold(self, |node, label| {
            node.children.iter().find(|child| child.label == *label)
        })
    }

    /// Mutable variant of [`find_path`](Self::find_path).
    pub fn find_path_mut(&mut self, labels: &[&str]) -> Option<&mut DisplayNode> {
        let mut node = self;
        for label in labels {
            node = node.children.iter_mut().find(|child| child.label == *label)?;
        }
        Some(node)
    }
}
