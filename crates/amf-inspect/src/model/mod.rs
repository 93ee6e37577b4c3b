//! Item model for tree views.
//!
//! [`TreeModel`] holds display nodes by ID and tells hosts about every
//! structural change through [`ModelSignals`]. A host toolkit mirrors the
//! model into its own widget and forwards "about to expand" events to
//! [`TreeModel::request_expand`].
//!
//! # Signal flow
//!
//! ```text
//! host expands node
//!   -> about_to_expand (slots may cancel)
//!   -> depth guard      (expansion_refused on failure)
//!   -> rows_about_to_be_removed / rows_removed   (placeholder)
//!   -> rows_about_to_be_inserted / rows_inserted (lazy children)
//! ```

mod signals;
mod tree_model;

pub use signals::{ExpandRequest, ModelSignals};
pub use tree_model::{NodeId, TreeModel};
