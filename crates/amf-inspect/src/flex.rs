//! Flex data service messages.
//!
//! BlazeDS and LiveCycle endpoints wrap remoting calls in these messages and
//! send them with short externalizable aliases (`DSA`, `DSK`, `DSC`). A
//! decoder registers [`ClassAliases::flex`] so those aliases resolve to the
//! types below; the tree sees them as ordinary composites.

use crate::error::DescribeError;
use crate::value::{Describable, Value};

/// Fields shared by every Flex message.
#[derive(Debug, Clone, Default)]
pub struct MessageEnvelope {
    /// Identifier of the client that sent the message (usually a 16-byte blob).
    pub client_id: Value,
    /// Destination service name.
    pub destination: Value,
    /// Unique message identifier.
    pub message_id: Value,
    /// Send time in milliseconds since the epoch.
    pub timestamp: Value,
    /// Milliseconds the message stays valid; 0 for no expiry.
    pub time_to_live: Value,
    /// Message headers (a mapping).
    pub headers: Value,
    /// Payload.
    pub body: Value,
}

impl MessageEnvelope {
    fn fields(&self) -> Vec<(String, Value)> {
        vec![
            ("clientId".to_string(), self.client_id.clone()),
            ("destination".to_string(), self.destination.clone()),
            ("messageId".to_string(), self.message_id.clone()),
            ("timestamp".to_string(), self.timestamp.clone()),
            ("timeToLive".to_string(), self.time_to_live.clone()),
            ("headers".to_string(), self.headers.clone()),
            ("body".to_string(), self.body.clone()),
        ]
    }
}

/// A publish/subscribe or remoting message (`DSA`).
#[derive(Debug, Clone, Default)]
pub struct AsyncMessage {
    /// Common fields.
    pub envelope: MessageEnvelope,
    /// Identifier of the message this one answers.
    pub correlation_id: Value,
}

impl Describable for AsyncMessage {
    fn type_name(&self) -> &str {
        "AsyncMessage"
    }

    fn describe(&self) -> Result<Vec<(String, Value)>, DescribeError> {
        let mut fields = self.envelope.fields();
        fields.push(("correlationId".to_string(), self.correlation_id.clone()));
        Ok(fields)
    }
}

/// A server acknowledgement (`DSK`).
#[derive(Debug, Clone, Default)]
pub struct AcknowledgeMessage {
    /// Common fields.
    pub envelope: MessageEnvelope,
    /// Identifier of the acknowledged message.
    pub correlation_id: Value,
}

impl Describable for AcknowledgeMessage {
    fn type_name(&self) -> &str {
        "AcknowledgeMessage"
    }

    fn describe(&self) -> Result<Vec<(String, Value)>, DescribeError> {
        let mut fields = self.envelope.fields();
        fields.push(("correlationId".to_string(), self.correlation_id.clone()));
        Ok(fields)
    }
}

/// A control message such as ping, login or subscribe (`DSC`).
#[derive(Debug, Clone, Default)]
pub struct CommandMessage {
    /// Common fields.
    pub envelope: MessageEnvelope,
    /// Identifier of the message this one answers.
    pub correlation_id: Value,
    /// Operation code.
    pub operation: Value,
}

impl CommandMessage {
    /// Client ping.
    pub const CLIENT_PING_OPERATION: i32 = 5;
    /// Login request.
    pub const LOGIN_OPERATION: i32 = 8;
    /// Logout request.
    pub const LOGOUT_OPERATION: i32 = 9;
}

impl Describable for CommandMessage {
    fn type_name(&self) -> &str {
        "CommandMessage"
    }

    fn describe(&self) -> Result<Vec<(String, Value)>, DescribeError> {
        let mut fields = self.envelope.fields();
        fields.push(("correlationId".to_string(), self.correlation_id.clone()));
        fields.push(("operation".to_string(), self.operation.clone()));
        Ok(fields)
    }
}

/// Maps external class aliases to full class names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassAliases {
    entries: Vec<(String, String)>,
}

impl ClassAliases {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The Flex message aliases.
    pub fn flex() -> Self {
        let mut aliases = Self::new();
        aliases.register("DSK", "flex.messaging.messages.AcknowledgeMessageExt");
        aliases.register("DSA", "flex.messaging.messages.AsyncMessageExt");
        aliases.register("DSC", "flex.messaging.messages.CommandMessageExt");
        aliases
    }

    /// Adds or replaces an alias.
    pub fn register(&mut self, alias: impl Into<String>, class_name: impl Into<String>) {
        let alias = alias.into();
        let class_name = class_name.into();
        match self.entries.iter_mut().find(|(a, _)| *a == alias) {
            Some((_, existing)) => *existing = class_name,
            None => self.entries.push((alias, class_name)),
        }
    }

    /// Full class name for `alias`.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, class)| class.as_str())
    }

    /// Alias registered for `class_name`.
    pub fn alias_of(&self, class_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, class)| class == class_name)
            .map(|(alias, _)| alias.as_str())
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no aliases are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_eager;
    use crate::value::{ByteArray, Mapping};

    #[test]
    fn test_flex_aliases() {
        let aliases = ClassAliases::flex();
        assert_eq!(aliases.len(), 3);
        assert_eq!(
            aliases.resolve("DSK"),
            Some("flex.messaging.messages.AcknowledgeMessageExt")
        );
        assert_eq!(
            aliases.alias_of("flex.messaging.messages.CommandMessageExt"),
            Some("DSC")
        );
        assert_eq!(aliases.resolve("DSX"), None);
    }

    #[test]
    fn test_register_replaces() {
        let mut aliases = ClassAliases::new();
        aliases.register("A", "one");
        aliases.register("A", "two");
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.resolve("A"), Some("two"));
    }

    #[test]
    fn test_field_order() {
        let message = CommandMessage {
            operation: Value::from(CommandMessage::CLIENT_PING_OPERATION),
            ..Default::default()
        };
        let names: Vec<String> = message
            .describe()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "clientId",
                "destination",
                "messageId",
                "timestamp",
                "timeToLive",
                "headers",
                "body",
                "correlationId",
                "operation"
            ]
        );
    }

    #[test]
    fn test_message_in_tree() {
        let message = AcknowledgeMessage {
            envelope: MessageEnvelope {
                client_id: Value::Blob(ByteArray::new((1..=16).collect::<Vec<u8>>())),
                destination: Value::from("echo"),
                headers: Value::Mapping(Mapping::anonymous()),
                ..Default::default()
            },
            correlation_id: Value::from("abc"),
        };

        let node = build_eager("Content", &Value::composite(message), 0);

        assert_eq!(node.label(), "Content");
        assert_eq!(node.children()[0].label(), "clientId: 04030201-0605-0807-090a-0b0c0d0e0f10");
        assert!(node.find_path(&["headers: {ASObject}"]).is_some());
        assert!(node.find_path(&["correlationId: abc"]).is_some());
        assert!(node.find_path(&["body: null"]).is_some());
    }
}
