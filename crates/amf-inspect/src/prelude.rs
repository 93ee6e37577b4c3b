//! Prelude module for AMF Inspect.
//!
//! Re-exports the types most hosts need:
//!
//! ```
//! use amf_inspect::prelude::*;
//! ```

pub use amf_inspect_core::{ConnectionId, Signal};

pub use crate::builder::{build_eager, build_lazy, enumerate_children};
pub use crate::classify::{Shape, classify};
pub use crate::error::{DescribeError, SettingsError};
pub use crate::expansion::{ExpandOutcome, ExpansionController};
pub use crate::format::{TreeFormatOptions, TreeFormatter, TreeStyle};
pub use crate::message::{AmfMessage, MessageBody, MessageHeader, MessageView};
pub use crate::model::{ExpandRequest, NodeId, TreeModel};
pub use crate::node::{DisplayNode, ExpansionState};
pub use crate::settings::InspectorSettings;
pub use crate::value::{ByteArray, Describable, Mapping, Primitive, Sequence, Value};
