//! Change notifications emitted by [`TreeModel`](super::TreeModel).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use amf_inspect_core::Signal;

use super::NodeId;

/// A pending expansion, offered to hosts before children are materialized.
///
/// Any slot connected to [`ModelSignals::about_to_expand`] may call
/// [`cancel`](Self::cancel) to veto the expansion with its own policy; the
/// node then stays collapsed.
#[derive(Debug, Clone)]
pub struct ExpandRequest {
    /// The node about to be expanded.
    pub node: NodeId,
    /// Its depth (number of ancestors).
    pub depth: usize,
    cancelled: Arc<AtomicBool>,
}

impl ExpandRequest {
    pub(crate) fn new(node: NodeId, depth: usize) -> Self {
        Self {
            node,
            depth,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Vetoes the expansion.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once any slot has vetoed the expansion.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Collection of signals emitted by the tree model.
///
/// Row signals carry `(parent, first row, last row)`; a `None` parent means
/// the top level.
///
/// - **Before modifications**: `rows_about_to_be_*`
/// - **After modifications**: `rows_*`
/// - **Label rewrites**: `label_changed`
/// - **Expansion**: `about_to_expand` (vetoable), `expansion_refused`
/// - **Major restructuring**: `model_reset`
pub struct ModelSignals {
    /// Emitted just before rows are inserted.
    pub rows_about_to_be_inserted: Signal<(Option<NodeId>, usize, usize)>,

    /// Emitted after rows have been inserted.
    pub rows_inserted: Signal<(Option<NodeId>, usize, usize)>,

    /// Emitted just before rows are removed.
    pub rows_about_to_be_removed: Signal<(Option<NodeId>, usize, usize)>,

    /// Emitted after rows have been removed.
    pub rows_removed: Signal<(Option<NodeId>, usize, usize)>,

    /// Emitted when a node's label text changes.
    pub label_changed: Signal<NodeId>,

    /// Emitted before a pending node is expanded.
    pub about_to_expand: Signal<ExpandRequest>,

    /// Emitted when the depth guard refuses an expansion.
    /// Args: (node, depth)
    pub expansion_refused: Signal<(NodeId, usize)>,

    /// Emitted after the model has been cleared.
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    /// Creates a new set of model signals.
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            label_changed: Signal::new(),
            about_to_expand: Signal::new(),
            expansion_refused: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    /// Emits signals for row insertion.
    ///
    /// Calls the provided function between the about_to_be_inserted and inserted signals.
    pub fn emit_rows_inserted<F, R>(
        &self,
        parent: Option<NodeId>,
        first: usize,
        last: usize,
        insert_fn: F,
    ) -> R
    where
        F: FnOnce() -> R,
    {
        self.rows_about_to_be_inserted.emit((parent, first, last));
        let result = insert_fn();
        self.rows_inserted.emit((parent, first, last));
        result
    }

    /// Emits signals for row removal.
    ///
    /// Calls the provided function between the about_to_be_removed and removed signals.
    pub fn emit_rows_removed<F, R>(
        &self,
        parent: Option<NodeId>,
        first: usize,
        last: usize,
        remove_fn: F,
    ) -> R
    where
        F: FnOnce() -> R,
    {
        self.rows_about_to_be_removed.emit((parent, first, last));
        let result = remove_fn();
        self.rows_removed.emit((parent, first, last));
        result
    }
}
