//! One-line labels for tree nodes.

use crate::classify::Shape;
use crate::value::Value;

/// Suffix appended to the label of a composite whose fields could not be read.
pub const UNREADABLE_MARKER: &str = "<unreadable>";

/// Renders the label of a node named `name` holding `value`.
///
/// Pure: eager and lazy materialization both go through here, so a tree
/// reads the same whichever mode built it. A `shape` that disagrees with
/// `value` falls back to the bare name.
pub fn render(name: &str, shape: Shape, value: &Value) -> String {
    match (shape, value) {
        (Shape::Absent, _) => format!("{name}: null"),
        (Shape::Text, Value::Text(text)) => format!("{name}: {text}"),
        (Shape::OpaqueBlob, Value::Blob(blob)) => format!("{name}: {}", blob.guid_string()),
        (Shape::Mapping, Value::Mapping(map)) => format!("{name}: {{{}}}", map.type_name()),
        (Shape::Sequence, Value::Sequence(seq)) => format!("{name}: [{}]", seq.len()),
        (Shape::Primitive, Value::Primitive(p)) => format!("{name}: {p}"),
        _ => name.to_string(),
    }
}

/// Appends the unreadable marker to a label.
pub fn mark_unreadable(label: &str) -> String {
    format!("{label} {UNREADABLE_MARKER}")
}

/// Display name of the `index`th element of a sequence.
pub fn index_name(index: usize) -> String {
    format!("[{index}]")
}
