//! Rendering of AMF messages into a [`TreeModel`].
//!
//! A message becomes two top-level groups:
//!
//! ```text
//! Header
//! +-- [0]
//! |   +-- Credentials            (header name)
//! |   +-- false                  (must-understand flag)
//! |   +-- Content: {ASObject}    (built eagerly)
//! Body
//! +-- [0]
//!     +-- Call: ...
//!     +-- Target: ...
//!     +-- Method: ...
//!     +-- TypeName: ...
//!     +-- Response: ...
//!     +-- Content                (built lazily)
//! ```
//!
//! Headers are small and acyclic in practice. Bodies carry application
//! objects that may reference themselves, so their content is only
//! materialized as the user opens it.

use std::sync::Arc;

use amf_inspect_core::logging::{span_names, targets};
use amf_inspect_core::PerfSpan;
use parking_lot::Mutex;

use crate::builder::{build_eager, build_lazy};
use crate::label::index_name;
use crate::model::{NodeId, TreeModel};
use crate::value::Value;

/// Label of the header group.
pub const HEADER_GROUP: &str = "Header";
/// Label of the body group.
pub const BODY_GROUP: &str = "Body";
/// Name of the content node under each header and body.
pub const CONTENT_NAME: &str = "Content";

/// Depth of a `Content` node: group, then `[i]`, then content.
const CONTENT_DEPTH: usize = 2;

/// One AMF packet header.
///
/// `content` is rendered eagerly and must not reference itself: a cyclic
/// header value never finishes building.
#[derive(Debug, Clone, Default)]
pub struct MessageHeader {
    /// Header name.
    pub name: String,
    /// Whether the receiver must understand the header.
    pub must_understand: bool,
    /// Header value.
    pub content: Value,
}

impl MessageHeader {
    /// Creates a header.
    pub fn new(name: impl Into<String>, must_understand: bool, content: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            must_understand,
            content: content.into(),
        }
    }
}

/// One AMF packet body.
#[derive(Debug, Clone, Default)]
pub struct MessageBody {
    /// Target and method as sent on the wire.
    pub call: String,
    /// Target URI.
    pub target: String,
    /// Method name.
    pub method: String,
    /// Service type name.
    pub type_name: String,
    /// Response URI.
    pub response: String,
    /// Body value.
    pub content: Value,
}

/// A decoded AMF packet.
#[derive(Debug, Clone, Default)]
pub struct AmfMessage {
    /// AMF encoding version (0 or 3).
    pub version: u16,
    /// Packet headers in wire order.
    pub headers: Vec<MessageHeader>,
    /// Packet bodies in wire order.
    pub bodies: Vec<MessageBody>,
}

#[derive(Debug, Clone, Copy)]
struct Groups {
    header: NodeId,
    body: NodeId,
}

/// Renders messages into a shared [`TreeModel`].
///
/// The view owns its two groups. Rendering a new message replaces them;
/// other top-level nodes in the model are left alone, except that
/// [`process_body`](Self::process_body) drops anything placed after the
/// body group.
pub struct MessageView {
    model: Arc<TreeModel>,
    groups: Mutex<Option<Groups>>,
}

impl MessageView {
    /// Creates a view that renders into `model`.
    pub fn new(model: Arc<TreeModel>) -> Self {
        Self {
            model,
            groups: Mutex::new(None),
        }
    }

    /// The model rendered into.
    pub fn model(&self) -> &Arc<TreeModel> {
        &self.model
    }

    /// The header group of the current rendering.
    pub fn header_group(&self) -> Option<NodeId> {
        let groups = *self.groups.lock();
        groups.map(|g| g.header)
    }

    /// The body group of the current rendering.
    pub fn body_group(&self) -> Option<NodeId> {
        let groups = *self.groups.lock();
        groups.map(|g| g.body)
    }

    /// Renders the headers of `message` and creates an empty body group.
    ///
    /// Any previous rendering by this view is removed first. Bodies are
    /// added with [`process_body`](Self::process_body).
    ///
    /// Header content goes through [`build_eager`], which enforces no depth
    /// limit; header values must be acyclic.
    pub fn process_message(&self, message: &AmfMessage) -> NodeId {
        let _span = PerfSpan::new(span_names::RENDER_MESSAGE);
        self.discard();

        let header = self.model.add_root(HEADER_GROUP);
        for (i, item) in message.headers.iter().enumerate() {
            let Some(entry) = self.model.add_child(header, index_name(i)) else {
                continue;
            };
            self.model.add_child(entry, item.name.as_str());
            self.model.add_child(entry, item.must_understand.to_string());
            self.model.insert_node(
                Some(entry),
                build_eager(CONTENT_NAME, &item.content, CONTENT_DEPTH),
            );
        }

        let body = self.model.add_root(BODY_GROUP);
        *self.groups.lock() = Some(Groups { header, body });

        tracing::debug!(
            target: targets::MESSAGE,
            version = message.version,
            headers = message.headers.len(),
            "rendered message headers"
        );
        body
    }

    /// Renders one body as `[index]` under the body group.
    ///
    /// Top-level nodes after the body group are removed first. Returns
    /// `None` if no message has been processed yet.
    pub fn process_body(&self, index: usize, body: &MessageBody) -> Option<NodeId> {
        let group = self.body_group()?;
        self.remove_trailing_roots(group);

        let entry = self.model.add_child(group, index_name(index))?;
        self.model.add_child(entry, format!("Call: {}", body.call));
        self.model.add_child(entry, format!("Target: {}", body.target));
        self.model.add_child(entry, format!("Method: {}", body.method));
        self.model.add_child(entry, format!("TypeName: {}", body.type_name));
        self.model.add_child(entry, format!("Response: {}", body.response));
        self.model.insert_node(
            Some(entry),
            build_lazy(CONTENT_NAME, &body.content, CONTENT_DEPTH),
        );

        tracing::debug!(target: targets::MESSAGE, index, target_uri = %body.target, "rendered body");
        Some(entry)
    }

    /// Renders a whole message: headers, then every body in order.
    pub fn render(&self, message: &AmfMessage) -> NodeId {
        let group = self.process_message(message);
        for (index, body) in message.bodies.iter().enumerate() {
            self.process_body(index, body);
        }
        group
    }

    /// Removes this view's groups from the model.
    pub fn discard(&self) {
        if let Some(groups) = self.groups.lock().take() {
            self.model.remove(groups.header);
            self.model.remove(groups.body);
        }
    }

    fn remove_trailing_roots(&self, group: NodeId) {
        let Some(row) = self.model.row(group) else {
            return;
        };
        let stale: Vec<NodeId> = self.model.children(None).into_iter().skip(row + 1).collect();
        if !stale.is_empty() {
            tracing::debug!(target: targets::MESSAGE, count = stale.len(), "removing nodes after body group");
        }
        for id in stale {
            self.model.remove(id);
        }
    }
}
