//! Decoded AMF values.
//!
//! [`Value`] is the in-memory form of one node of a deserialized message
//! graph. It is a cheap handle: cloning a `Value` never copies a mapping,
//! sequence or composite, it only bumps a reference count. This is what lets
//! a lazily built tree node keep "the value whose children are not shown yet"
//! around without owning the decoded graph.
//!
//! Mappings and sequences are shared and internally mutable so a decoder can
//! reproduce AMF object references, including references back to an object
//! that is still being read:
//!
//! ```
//! use amf_inspect::value::{Mapping, Value};
//!
//! let node = Mapping::new("Node");
//! node.insert("self", Value::Mapping(node.clone()));
//! assert_eq!(node.len(), 1);
//!
//! // Break the reference cycle once the graph is no longer needed.
//! node.clear();
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::DescribeError;

/// The type name used for anonymous AMF objects.
pub const ANONYMOUS_OBJECT_TYPE: &str = "ASObject";

/// A decoded AMF value.
#[derive(Clone, Default)]
pub enum Value {
    /// `null` or `undefined`.
    #[default]
    Null,
    /// A string.
    Text(String),
    /// A `ByteArray`, displayed by its derived identifier.
    Blob(ByteArray),
    /// A keyed mapping (anonymous object, dynamic object or dictionary).
    Mapping(Arc<Mapping>),
    /// An ordered, index-addressable collection.
    Sequence(Arc<Sequence>),
    /// A scalar value type.
    Primitive(Primitive),
    /// A typed object that describes its own fields.
    Composite(Arc<dyn Describable>),
}

impl Value {
    /// Returns `true` for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Creates a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// Wraps a typed object.
    pub fn composite<T: Describable + 'static>(object: T) -> Self {
        Value::Composite(Arc::new(object))
    }

    /// Returns the string content if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shallow on purpose: decoded graphs may contain themselves.
        match self {
            Value::Null => f.write_str("Null"),
            Value::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Value::Blob(blob) => f.debug_tuple("Blob").field(&blob.len()).finish(),
            Value::Mapping(map) => write!(f, "Mapping({}, {} entries)", map.type_name(), map.len()),
            Value::Sequence(seq) => write!(f, "Sequence({} elements)", seq.len()),
            Value::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
            Value::Composite(c) => write!(f, "Composite({})", c.type_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Primitive(Primitive::Boolean(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Primitive(Primitive::Integer(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Primitive(Primitive::Number(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Primitive(Primitive::Date(value))
    }
}

impl From<ByteArray> for Value {
    fn from(value: ByteArray) -> Self {
        Value::Blob(value)
    }
}

impl From<Arc<Mapping>> for Value {
    fn from(value: Arc<Mapping>) -> Self {
        Value::Mapping(value)
    }
}

impl From<Arc<Sequence>> for Value {
    fn from(value: Arc<Sequence>) -> Self {
        Value::Sequence(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Scalar AMF values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// `true` / `false`.
    Boolean(bool),
    /// AMF3 29-bit integer (stored widened).
    Integer(i32),
    /// IEEE-754 double.
    Number(f64),
    /// Date, normalized to UTC.
    Date(DateTime<Utc>),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Boolean(b) => write!(f, "{b}"),
            Primitive::Integer(i) => write!(f, "{i}"),
            Primitive::Number(n) => write!(f, "{n}"),
            Primitive::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// An AMF `ByteArray`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteArray {
    bytes: Vec<u8>,
}

impl ByteArray {
    /// Wraps raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the array holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Stable identifier derived from the content.
    ///
    /// Flex encodes client and message ids as 16-byte `ByteArray`s, so the
    /// first 16 bytes are read as a GUID with the first three groups in
    /// little-endian order. Shorter arrays are zero padded; bytes past the
    /// sixteenth do not take part.
    pub fn guid_string(&self) -> String {
        let mut raw = [0u8; 16];
        let n = self.bytes.len().min(16);
        raw[..n].copy_from_slice(&self.bytes[..n]);
        Uuid::from_bytes_le(raw).hyphenated().to_string()
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// A keyed mapping with a declared type name.
///
/// Keys are unique and keep their insertion order; inserting an existing key
/// replaces its value in place.
pub struct Mapping {
    type_name: String,
    entries: RwLock<Vec<(String, Value)>>,
}

impl Mapping {
    /// Creates an empty shared mapping.
    pub fn new(type_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            type_name: type_name.into(),
            entries: RwLock::new(Vec::new()),
        })
    }

    /// Creates an empty anonymous object.
    pub fn anonymous() -> Arc<Self> {
        Self::new(ANONYMOUS_OBJECT_TYPE)
    }

    /// Creates a shared mapping from entries. Later duplicates replace earlier ones.
    pub fn from_entries<K, V, I>(type_name: impl Into<String>, entries: I) -> Arc<Self>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = Self::new(type_name);
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    /// The declared type name, shown as `{TypeName}`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Inserts or replaces an entry. Returns the previous value for the key.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Looks up an entry by key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries.read().clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes every entry, breaking any reference cycle through this mapping.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// An ordered collection of values.
#[derive(Default)]
pub struct Sequence {
    elements: RwLock<Vec<Value>>,
}

impl Sequence {
    /// Creates an empty shared sequence.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a shared sequence from values.
    pub fn from_values<V, I>(values: I) -> Arc<Self>
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Arc::new(Self {
            elements: RwLock::new(values.into_iter().map(Into::into).collect()),
        })
    }

    /// Appends an element.
    pub fn push(&self, value: impl Into<Value>) {
        self.elements.write().push(value.into());
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.elements.read().get(index).cloned()
    }

    /// Snapshot of the elements.
    pub fn elements(&self) -> Vec<Value> {
        self.elements.read().clone()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }

    /// Removes every element, breaking any reference cycle through this sequence.
    pub fn clear(&self) {
        self.elements.write().clear();
    }
}

/// A typed object that can list its named fields.
///
/// This is how registered classes (for example the Flex messaging types in
/// [`crate::flex`]) take part in the tree: the field list is what an expanded
/// node shows, in the order returned.
pub trait Describable: Send + Sync {
    /// Short type name of the object.
    fn type_name(&self) -> &str;

    /// The object's fields, in declaration order.
    ///
    /// The default describes no fields, which is how objects of an
    /// unrecognized type are shown.
    fn describe(&self) -> Result<Vec<(String, Value)>, DescribeError> {
        Ok(Vec::new())
    }
}

/// A composite of an unregistered class: only its name is known.
#[derive(Debug, Clone)]
pub struct UnknownObject {
    type_name: String,
}

impl UnknownObject {
    /// Creates a placeholder for an object of the given class.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Describable for UnknownObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }
}

static_assertions::assert_impl_all!(Value: Send, Sync);
