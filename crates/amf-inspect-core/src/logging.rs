//! Logging facilities for AMF Inspect.
//!
//! AMF Inspect uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("amf_inspect=debug")
//!         .init();
//! }
//! ```
//!
//! Every subsystem logs under one of the fixed [`targets`], so hosts can turn
//! on, for example, expansion decisions without the per-row model chatter.

/// Span names used throughout AMF Inspect for tracing.
pub mod span_names {
    /// Child materialization for one expansion request.
    pub const EXPAND: &str = "amf_inspect::expand";
    /// Eager construction of a whole subtree.
    pub const BUILD_EAGER: &str = "amf_inspect::build_eager";
    /// Rendering of a complete message.
    pub const RENDER_MESSAGE: &str = "amf_inspect::render_message";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "amf_inspect_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "amf_inspect_core::signal";
    /// Tree builder (eager/lazy materialization) target.
    pub const BUILDER: &str = "amf_inspect::builder";
    /// Expansion controller target.
    pub const EXPANSION: &str = "amf_inspect::expansion";
    /// Tree model target.
    pub const MODEL: &str = "amf_inspect::model";
    /// Message rendering target.
    pub const MESSAGE: &str = "amf_inspect::message";
    /// Settings loading target.
    pub const SETTINGS: &str = "amf_inspect::settings";
    /// Performance spans target.
    pub const PERF: &str = "amf_inspect::perf";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// This is useful for tracking the duration of an operation.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
