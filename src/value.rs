//! # JSON Value Graph
//!
//! Defines the untyped decode target: a tagged variant over the six JSON
//! value shapes. Objects preserve insertion order with last-write-wins
//! semantics on duplicate keys; numbers retain their literal text so the
//! consumer can choose an integer or float representation without precision
//! loss.
use std::collections::HashMap;

use crate::error::JsonError;

/// Primary JSON value definition.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// The `null` literal.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A numeric value, literal text preserved.
    Number(Number),
    /// A string value.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<JsonValue>),
    /// A mapping from string keys to values, insertion order preserved.
    Object(ObjectMap),
}

impl JsonValue {
    /// Compute the depth of the JSON document.
    pub fn depth(&self) -> usize {
        match self {
            Self::Object(map) => {
                1 + map.values().map(Self::depth).max().unwrap_or(0)
            }
            Self::Array(arr) => {
                1 + arr.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => {
                1
            }
        }
    }

    /// Returns the contained object map, if this is an object.
    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the contained array, if this is an array.
    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns the contained string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the contained number, if this is a number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns whether this value is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns a [`JsonError`] if the value cannot be represented in the
    /// default wire grammar.
    pub fn to_json(&self) -> Result<String, JsonError> {
        crate::Json::new(crate::JsonConfig::new()).encode(self)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns a [`JsonError`] if the value cannot be represented in the
    /// default wire grammar.
    pub fn to_json_pretty(&self) -> Result<String, JsonError> {
        crate::Json::new(crate::JsonConfig::new().pretty_print(true))
            .encode(self)
    }
}

/// A JSON number holding its literal wire text verbatim.
///
/// Equality is textual first, then numeric: `Number::from(1.0)` and a parsed
/// `1` compare equal, and the non-finite literals compare equal to
/// themselves even though `NaN != NaN` as floats.
#[derive(Debug, Clone)]
pub struct Number {
    text: String,
}

impl Number {
    /// Wrap a raw numeric literal as it appeared on the wire.
    pub fn from_literal(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The literal text of this number.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Interpret the literal as a double, honoring the `NaN`/`Infinity`
    /// extension literals.
    pub fn as_f64(&self) -> Option<f64> {
        match self.text.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            text => text.parse().ok(),
        }
    }

    /// Interpret the literal as a signed integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        self.text.parse().ok()
    }

    /// Interpret the literal as an unsigned integer, if it is one.
    pub fn as_u64(&self) -> Option<u64> {
        self.text.parse().ok()
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self {
            text: value.to_string(),
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self {
            text: value.to_string(),
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        let text = if value.is_nan() {
            "NaN".to_string()
        } else if value == f64::INFINITY {
            "Infinity".to_string()
        } else if value == f64::NEG_INFINITY {
            "-Infinity".to_string()
        } else {
            // Rust's float Display is the shortest round-trip form.
            value.to_string()
        };
        Self { text }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if self.text == other.text {
            return true;
        }
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A string-keyed map where iteration follows insertion order of the keys,
/// independent of hash values. Re-inserting an existing key overwrites the
/// value but keeps the key's original position (last write wins).
#[derive(Debug, Clone, Default)]
pub struct ObjectMap {
    keys: Vec<String>,
    map: HashMap<String, JsonValue>,
}

impl ObjectMap {
    /// Construct an empty object map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the given key-value pair, overwriting an existing value for
    /// the same key.
    pub fn insert(&mut self, key: String, value: JsonValue) {
        if !self.map.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.map.insert(key, value);
    }

    /// Retrieve the value for a given key, if it exists.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.map.get(key)
    }

    /// Return whether the given key exists within the map.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.keys
            .iter()
            .filter_map(|key| self.map.get(key).map(|val| (key.as_str(), val)))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Iterate over values in key insertion order.
    pub fn values(&self) -> impl Iterator<Item = &JsonValue> {
        self.keys.iter().filter_map(|key| self.map.get(key))
    }
}

// Entry-set equality: key order does not affect comparison.
impl PartialEq for ObjectMap {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self
                .map
                .iter()
                .all(|(key, val)| other.map.get(key) == Some(val))
    }
}

impl FromIterator<(String, JsonValue)> for ObjectMap {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(
        iter: I,
    ) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
