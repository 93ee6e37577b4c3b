//! Hierarchical tree model with lazy, depth-guarded expansion.
//!
//! `TreeModel` is the host-facing side of the tree core. It stores display
//! nodes by [`NodeId`] with parent links, so a host that only knows which
//! node the user is about to open can ask for that node's depth and pending
//! value and have the model materialize its children.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use amf_inspect_core::logging::{span_names, targets};
use amf_inspect_core::PerfSpan;

use super::signals::{ExpandRequest, ModelSignals};
use crate::expansion::{ExpandOutcome, ExpansionController};
use crate::label::mark_unreadable;
use crate::node::{DisplayNode, ExpansionState};
use crate::settings::InspectorSettings;
use crate::value::Value;

/// Identifier of a node in a [`TreeModel`].
pub type NodeId = u64;

/// Counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A node in the tree structure.
struct TreeNode {
    label: String,
    pending: Option<Value>,
    container: bool,
    placeholder: bool,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    fn new(label: String, parent: Option<NodeId>) -> Self {
        Self {
            label,
            pending: None,
            container: false,
            placeholder: false,
            children: Vec::new(),
            parent,
        }
    }

    fn state(&self) -> ExpansionState {
        if self.pending.is_some() {
            ExpansionState::CollapsedPending
        } else if self.container {
            ExpansionState::Expanded
        } else {
            ExpansionState::Leaf
        }
    }
}

/// Internal storage for tree nodes.
struct TreeStorage {
    nodes: HashMap<NodeId, TreeNode>,
    root_children: Vec<NodeId>,
}

impl TreeStorage {
    fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root_children: Vec::new(),
        }
    }

    fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Attaches `node` under `parent` (or at the top level). The parent must exist.
    fn attach(&mut self, parent: Option<NodeId>, node: TreeNode) -> NodeId {
        let id = next_node_id();
        self.nodes.insert(id, node);
        match parent {
            Some(pid) => {
                if let Some(parent) = self.nodes.get_mut(&pid) {
                    parent.children.push(id);
                }
            }
            None => self.root_children.push(id),
        }
        id
    }

    /// Copies a materialized subtree in, breadth first.
    fn attach_subtree(&mut self, parent: Option<NodeId>, subtree: DisplayNode) -> NodeId {
        let mut queue = std::collections::VecDeque::from([(parent, subtree)]);
        let mut top = None;
        while let Some((parent, node)) = queue.pop_front() {
            let DisplayNode {
                label,
                children,
                pending,
                container,
                placeholder,
                ..
            } = node;
            let stored = TreeNode {
                pending,
                container,
                placeholder,
                ..TreeNode::new(label, parent)
            };
            let id = self.attach(parent, stored);
            top.get_or_insert(id);
            queue.extend(children.into_iter().map(|child| (Some(id), child)));
        }
        top.unwrap_or_default()
    }

    fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        match node.parent {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|&child_id| child_id != id);
                }
            }
            None => self.root_children.retain(|&child_id| child_id != id),
        }
        self.remove_subtree(id);
        true
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children);
            }
        }
    }

    fn children_of(&self, parent_id: Option<NodeId>) -> &[NodeId] {
        match parent_id {
            None => &self.root_children,
            Some(id) => self
                .nodes
                .get(&id)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[]),
        }
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn row_of(&self, id: NodeId) -> Option<usize> {
        let parent_id = self.parent_of(id);
        self.children_of(parent_id)
            .iter()
            .position(|&child_id| child_id == id)
    }

    /// Number of ancestors of `id`; top-level nodes have depth 0.
    fn depth_of(&self, id: NodeId) -> Option<usize> {
        let mut node = self.get_node(id)?;
        let mut depth = 0;
        while let Some(parent) = node.parent.and_then(|pid| self.get_node(pid)) {
            depth += 1;
            node = parent;
        }
        Some(depth)
    }

    fn to_display_node(&self, id: NodeId, depth: usize) -> Option<DisplayNode> {
        let node = self.get_node(id)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.to_display_node(child, depth + 1))
            .collect();
        Some(DisplayNode {
            name: node.label.clone(),
            label: node.label.clone(),
            children,
            pending: node.pending.clone(),
            depth,
            container: node.container,
            placeholder: node.placeholder,
        })
    }
}

/// A hierarchical model of display nodes.
///
/// Nodes are added as plain labels ([`add_root`](Self::add_root),
/// [`add_child`](Self::add_child)) or as whole materialized subtrees
/// ([`insert_node`](Self::insert_node)). Lazy subtrees keep their pending
/// values; [`request_expand`](Self::request_expand) turns one of them into
/// real children when the host is about to show it.
///
/// # Example
///
/// ```
/// use amf_inspect::builder::build_lazy;
/// use amf_inspect::model::TreeModel;
/// use amf_inspect::value::{Sequence, Value};
///
/// let model = TreeModel::default();
/// let body = model.add_root("Body");
/// let list = Value::Sequence(Sequence::from_values(["a", "b"]));
/// let content = model.insert_node(Some(body), build_lazy("Content", &list, 1)).unwrap();
///
/// assert!(model.can_fetch_more(content));
/// model.request_expand(content);
/// assert_eq!(model.child_labels(Some(content)), vec!["[0]: a", "[1]: b"]);
/// ```
pub struct TreeModel {
    storage: RwLock<TreeStorage>,
    controller: ExpansionController,
    signals: ModelSignals,
    /// Nodes with a `request_expand` call in progress.
    expanding: Mutex<HashSet<NodeId>>,
}

/// Marks a node as being expanded until dropped.
struct ExpandingGuard<'a> {
    expanding: &'a Mutex<HashSet<NodeId>>,
    id: NodeId,
}

impl<'a> ExpandingGuard<'a> {
    fn acquire(expanding: &'a Mutex<HashSet<NodeId>>, id: NodeId) -> Option<Self> {
        if !expanding.lock().insert(id) {
            return None;
        }
        Some(Self { expanding, id })
    }
}

impl Drop for ExpandingGuard<'_> {
    fn drop(&mut self) {
        self.expanding.lock().remove(&self.id);
    }
}

impl Default for TreeModel {
    fn default() -> Self {
        Self::new(ExpansionController::default())
    }
}

impl TreeModel {
    /// Creates an empty model using `controller` for expansion decisions.
    pub fn new(controller: ExpansionController) -> Self {
        Self {
            storage: RwLock::new(TreeStorage::new()),
            controller,
            signals: ModelSignals::new(),
            expanding: Mutex::new(HashSet::new()),
        }
    }

    /// Creates an empty model configured from settings.
    pub fn with_settings(settings: &InspectorSettings) -> Self {
        Self::new(ExpansionController::from_settings(settings))
    }

    /// The model's signals.
    pub fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    /// The expansion controller in use.
    pub fn controller(&self) -> &ExpansionController {
        &self.controller
    }

    /// Adds a top-level node and returns its ID.
    pub fn add_root(&self, label: impl Into<String>) -> NodeId {
        let label = label.into();
        let row = self.storage.read().root_children.len();
        self.signals.emit_rows_inserted(None, row, row, || {
            self.storage.write().attach(None, TreeNode::new(label, None))
        })
    }

    /// Adds a plain child node to the specified parent and returns its ID.
    ///
    /// Returns `None` if the parent doesn't exist.
    pub fn add_child(&self, parent_id: NodeId, label: impl Into<String>) -> Option<NodeId> {
        let label = label.into();
        let row = self.storage.read().get_node(parent_id)?.children.len();
        let id = self.signals.emit_rows_inserted(Some(parent_id), row, row, || {
            self.storage
                .write()
                .attach(Some(parent_id), TreeNode::new(label, Some(parent_id)))
        });
        Some(id)
    }

    /// Inserts a materialized subtree, keeping pending values and placeholders.
    ///
    /// The stored depth of every node is its position in this model, whatever
    /// depth the subtree was built at. Returns `None` if the parent doesn't exist.
    pub fn insert_node(&self, parent: Option<NodeId>, subtree: DisplayNode) -> Option<NodeId> {
        let row = {
            let storage = self.storage.read();
            if let Some(pid) = parent {
                if !storage.contains(pid) {
                    return None;
                }
            }
            storage.children_of(parent).len()
        };
        let id = self.signals.emit_rows_inserted(parent, row, row, || {
            self.storage.write().attach_subtree(parent, subtree)
        });
        Some(id)
    }

    /// Removes a node and all its descendants.
    ///
    /// Returns `false` if the node doesn't exist.
    pub fn remove(&self, id: NodeId) -> bool {
        let (parent, row) = {
            let storage = self.storage.read();
            match storage.row_of(id) {
                Some(row) if storage.contains(id) => (storage.parent_of(id), row),
                _ => return false,
            }
        };
        self.signals
            .emit_rows_removed(parent, row, row, || self.storage.write().remove_node(id))
    }

    /// Clears all nodes from the tree.
    pub fn clear(&self) {
        {
            let mut storage = self.storage.write();
            storage.nodes.clear();
            storage.root_children.clear();
        }
        self.signals.model_reset.emit(());
    }

    /// Returns the number of top-level nodes.
    pub fn root_count(&self) -> usize {
        self.storage.read().root_children.len()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.read().root_children.is_empty()
    }

    /// Returns `true` if the node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.storage.read().contains(id)
    }

    /// The node's label.
    pub fn label(&self, id: NodeId) -> Option<String> {
        self.storage.read().get_node(id).map(|n| n.label.clone())
    }

    /// Replaces a node's label and emits `label_changed`.
    pub fn set_label(&self, id: NodeId, label: impl Into<String>) -> bool {
        let changed = match self.storage.write().get_node_mut(id) {
            Some(node) => {
                node.label = label.into();
                true
            }
            None => false,
        };
        if changed {
            self.signals.label_changed.emit(id);
        }
        changed
    }

    /// Children of `parent` (`None` for the top level), in display order.
    pub fn children(&self, parent: Option<NodeId>) -> Vec<NodeId> {
        self.storage.read().children_of(parent).to_vec()
    }

    /// Labels of the children of `parent`, in display order.
    pub fn child_labels(&self, parent: Option<NodeId>) -> Vec<String> {
        let storage = self.storage.read();
        storage
            .children_of(parent)
            .iter()
            .filter_map(|&id| storage.get_node(id).map(|n| n.label.clone()))
            .collect()
    }

    /// Number of children of `parent` (`None` for the top level).
    pub fn child_count(&self, parent: Option<NodeId>) -> usize {
        self.storage.read().children_of(parent).len()
    }

    /// The child of `parent` at `row`.
    pub fn child_at(&self, parent: Option<NodeId>, row: usize) -> Option<NodeId> {
        self.storage.read().children_of(parent).get(row).copied()
    }

    /// The first child of `parent` with exactly this label.
    pub fn find_child(&self, parent: Option<NodeId>, label: &str) -> Option<NodeId> {
        let storage = self.storage.read();
        storage
            .children_of(parent)
            .iter()
            .copied()
            .find(|&id| storage.get_node(id).is_some_and(|n| n.label == label))
    }

    /// The first top-level node with exactly this label.
    pub fn find_root(&self, label: &str) -> Option<NodeId> {
        self.find_child(None, label)
    }

    /// Follows child labels from `start` (`None` for the top level).
    pub fn find_path(&self, start: Option<NodeId>, labels: &[&str]) -> Option<NodeId> {
        let mut current = start;
        for label in labels {
            current = Some(self.find_child(current, label)?);
        }
        current
    }

    /// The node's parent; `None` for top-level or unknown nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.storage.read().parent_of(id)
    }

    /// The node's row within its parent.
    pub fn row(&self, id: NodeId) -> Option<usize> {
        let storage = self.storage.read();
        if !storage.contains(id) {
            return None;
        }
        storage.row_of(id)
    }

    /// The node's depth: how many ancestors it has.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.storage.read().depth_of(id)
    }

    /// Labels from the top level down to the node.
    pub fn path(&self, id: NodeId) -> Vec<String> {
        let storage = self.storage.read();
        let mut labels = Vec::new();
        let mut current = storage.get_node(id);
        while let Some(node) = current {
            labels.push(node.label.clone());
            current = node.parent.and_then(|pid| storage.get_node(pid));
        }
        labels.reverse();
        labels
    }

    /// The deferred value of a collapsed lazy node.
    pub fn pending(&self, id: NodeId) -> Option<Value> {
        self.storage.read().get_node(id)?.pending.clone()
    }

    /// Returns `true` if the node still has children to materialize.
    pub fn can_fetch_more(&self, id: NodeId) -> bool {
        self.storage
            .read()
            .get_node(id)
            .is_some_and(|n| n.pending.is_some())
    }

    /// Returns `true` if the node has any children, placeholders included.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.storage
            .read()
            .get_node(id)
            .is_some_and(|n| !n.children.is_empty())
    }

    /// Returns `true` for the synthetic child of a collapsed lazy node.
    pub fn is_placeholder(&self, id: NodeId) -> bool {
        self.storage
            .read()
            .get_node(id)
            .is_some_and(|n| n.placeholder)
    }

    /// Expansion state of the node.
    pub fn state(&self, id: NodeId) -> Option<ExpansionState> {
        self.storage.read().get_node(id).map(TreeNode::state)
    }

    /// Copies the subtree rooted at `id` out as a [`DisplayNode`].
    pub fn to_display_node(&self, id: NodeId) -> Option<DisplayNode> {
        let storage = self.storage.read();
        let depth = storage.depth_of(id)?;
        storage.to_display_node(id, depth)
    }

    /// Handles the host's "about to show the children of `id`" signal.
    ///
    /// In order: nodes with nothing pending are left alone; hosts connected
    /// to `about_to_expand` may veto; the depth guard may refuse. Otherwise
    /// the placeholder is removed, one level of lazy children is inserted
    /// and the pending value is dropped. Never fails.
    ///
    /// A request for a node whose expansion is already in progress, for
    /// example from a slot connected to `about_to_expand`, returns
    /// [`ExpandOutcome::NotPending`] without touching the tree.
    pub fn request_expand(&self, id: NodeId) -> ExpandOutcome {
        let (pending, depth) = {
            let storage = self.storage.read();
            let Some(node) = storage.get_node(id) else {
                return ExpandOutcome::NotPending;
            };
            let Some(pending) = node.pending.clone() else {
                return ExpandOutcome::NotPending;
            };
            (pending, storage.depth_of(id).unwrap_or_default())
        };

        let Some(_guard) = ExpandingGuard::acquire(&self.expanding, id) else {
            tracing::trace!(target: targets::MODEL, node = id, "expansion already in progress");
            return ExpandOutcome::NotPending;
        };

        let request = ExpandRequest::new(id, depth);
        self.signals.about_to_expand.emit(request.clone());
        if request.is_cancelled() {
            tracing::debug!(target: targets::MODEL, node = id, depth, "expansion cancelled by host");
            return ExpandOutcome::Cancelled;
        }

        if !self.controller.admits(depth) {
            tracing::debug!(
                target: targets::MODEL,
                node = id,
                depth,
                max_depth = self.controller.max_depth(),
                "expansion refused"
            );
            self.signals.expansion_refused.emit((id, depth));
            return ExpandOutcome::Refused { depth };
        }

        let _span = PerfSpan::new(span_names::EXPAND);
        let materialized = self.controller.materialize(&pending, depth);

        let Some(placeholders) = self.take_pending(id) else {
            return ExpandOutcome::NotPending;
        };
        if placeholders > 0 {
            self.signals.emit_rows_removed(Some(id), 0, placeholders - 1, || {
                self.drop_children(id)
            });
        }

        let count = materialized.children.len();
        if count > 0 {
            self.signals.emit_rows_inserted(Some(id), 0, count - 1, || {
                let mut storage = self.storage.write();
                for child in materialized.children {
                    storage.attach_subtree(Some(id), child);
                }
            });
        }

        if materialized.unreadable {
            if let Some(label) = self.label(id) {
                self.set_label(id, mark_unreadable(&label));
            }
        }

        tracing::trace!(target: targets::MODEL, node = id, depth, children = count, "expanded");
        ExpandOutcome::Expanded { children: count }
    }

    /// Clears the pending value. Returns the number of placeholder children
    /// left to remove, or `None` if nothing was pending.
    fn take_pending(&self, id: NodeId) -> Option<usize> {
        let mut storage = self.storage.write();
        let node = storage.get_node_mut(id)?;
        node.pending.take()?;
        Some(node.children.len())
    }

    fn drop_children(&self, id: NodeId) {
        let mut storage = self.storage.write();
        let children = storage
            .get_node_mut(id)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            storage.remove_subtree(child);
        }
    }

    /// Requests expansion of `id` and every descendant, as an "expand all"
    /// button would.
    ///
    /// Uses an explicit work list; on cyclic graphs the depth guard ends the
    /// walk. Returns the number of nodes expanded.
    pub fn expand_all(&self, id: NodeId) -> usize {
        let mut expanded = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.request_expand(current).is_expanded() {
                expanded += 1;
            }
            let mut children = self.children(Some(current));
            children.reverse();
            stack.extend(children);
        }
        expanded
    }
}

static_assertions::assert_impl_all!(TreeModel: Send, Sync);
