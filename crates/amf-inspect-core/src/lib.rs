//! Core systems for AMF Inspect.
//!
//! This crate provides the pieces shared by every AMF Inspect host adapter:
//!
//! - **Signal/Slot System**: Type-safe change notification for tree models
//! - **Logging**: `tracing` targets, span names and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use amf_inspect_core::Signal;
//!
//! let rows_inserted = Signal::<(u64, usize, usize)>::new();
//!
//! let conn_id = rows_inserted.connect(|(parent, first, last)| {
//!     println!("rows {}..={} inserted under {}", first, last, parent);
//! });
//!
//! rows_inserted.emit((7, 0, 2));
//! rows_inserted.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
