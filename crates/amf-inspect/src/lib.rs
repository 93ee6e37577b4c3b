//! AMF Inspect - tree views of decoded AMF message graphs.
//!
//! Decoded AMF data is an object graph that may contain reference cycles: an
//! object can hold a reference to itself or to an ancestor. This crate turns
//! such graphs into display trees without ever walking a cycle to the end:
//!
//! - **Classification and labels** ([`classify`], [`label`]): every value
//!   maps to one [`Shape`](classify::Shape) and one single-line label.
//! - **Materialization** ([`builder`]): eager for small acyclic data, lazy
//!   (one level plus a `...` placeholder) for anything else.
//! - **Expansion** ([`expansion`]): one level per request, refused past a
//!   configurable depth ([`settings`]).
//! - **Host adapters**: an item model with change signals ([`model`]), a
//!   message renderer ([`message`]) and a text formatter ([`format`]).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use amf_inspect::prelude::*;
//!
//! let node = Mapping::new("Node");
//! node.insert("next", Value::Mapping(node.clone()));
//!
//! let model = Arc::new(TreeModel::default());
//! let view = MessageView::new(model.clone());
//! view.render(&AmfMessage {
//!     version: 3,
//!     headers: Vec::new(),
//!     bodies: vec![MessageBody {
//!         content: Value::Mapping(node.clone()),
//!         ..Default::default()
//!     }],
//! });
//!
//! let content = model.find_path(None, &["Body", "[0]", "Content: {Node}"]).unwrap();
//! // "Expand all" on a self-referencing object stops at the depth limit.
//! assert_eq!(model.expand_all(content), 9);
//!
//! node.clear();
//! ```

pub mod builder;
pub mod classify;
pub mod error;
pub mod expansion;
pub mod flex;
pub mod format;
pub mod label;
pub mod message;
pub mod model;
pub mod node;
pub mod prelude;
pub mod settings;
pub mod value;

pub use error::{DescribeError, SettingsError, SettingsResult};
