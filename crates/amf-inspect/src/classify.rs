//! Shape classification of decoded values.

use crate::value::Value;

/// The display category of a [`Value`].
///
/// The shape drives both the label format and the child-enumeration rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// No value.
    Absent,
    /// A string, shown verbatim.
    Text,
    /// Binary content, shown by its derived identifier.
    OpaqueBlob,
    /// Keyed entries, shown as `{TypeName}`.
    Mapping,
    /// Ordered elements, shown as `[count]`.
    Sequence,
    /// A scalar, shown in its natural string form.
    Primitive,
    /// A typed object whose fields are its children.
    Composite,
}

impl Shape {
    /// Returns `true` for shapes whose values have children.
    pub fn is_container(self) -> bool {
        matches!(self, Shape::Mapping | Shape::Sequence | Shape::Composite)
    }
}

/// Classifies a value.
///
/// The arms are checked in a fixed priority order: absence, text, binary,
/// mapping, sequence, primitive, then composite as the catch-all. Total over
/// every value; objects of unregistered types land in `Composite`.
pub fn classify(value: &Value) -> Shape {
    match value {
        Value::Null => Shape::Absent,
        Value::Text(_) => Shape::Text,
        Value::Blob(_) => Shape::OpaqueBlob,
        Value::Mapping(_) => Shape::Mapping,
        Value::Sequence(_) => Shape::Sequence,
        Value::Primitive(_) => Shape::Primitive,
        Value::Composite(_) => Shape::Composite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ByteArray, Mapping, Sequence, UnknownObject};

    #[test]
    fn test_classify_every_variant() {
        let cases = [
            (Value::Null, Shape::Absent),
            (Value::text(""), Shape::Text),
            (Value::Blob(ByteArray::new(vec![1, 2])), Shape::OpaqueBlob),
            (Value::Mapping(Mapping::new("Foo")), Shape::Mapping),
            (Value::Sequence(Sequence::new()), Shape::Sequence),
            (Value::from(42), Shape::Primitive),
            (Value::from(false), Shape::Primitive),
            (Value::composite(UnknownObject::new("Bar")), Shape::Composite),
        ];
        for (value, expected) in cases {
            assert_eq!(classify(&value), expected, "{:?}", value);
        }
    }

    #[test]
    fn test_container_shapes() {
        assert!(Shape::Mapping.is_container());
        assert!(Shape::Sequence.is_container());
        assert!(Shape::Composite.is_container());
        assert!(!Shape::Absent.is_container());
        assert!(!Shape::Text.is_container());
        assert!(!Shape::OpaqueBlob.is_container());
        assert!(!Shape::Primitive.is_container());
    }

    #[test]
    fn test_empty_text_is_still_text() {
        // An empty string is a value, not an absence.
        assert_eq!(classify(&Value::text("")), Shape::Text);
    }
}
