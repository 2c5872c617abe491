//! Typed key/value attributes attached to graph nodes and edges.
//!
//! Graph sources attach arbitrary attributes (penalties, speed limits,
//! semantic classes, measured traversal times) to nodes and edges. Scorers
//! read them through the typed accessors here; a missing key is a normal
//! state and every accessor reports it as `None`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    /// Numeric view of the value. Integers widen to `f64`; text is not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(value) => Some(*value),
            MetadataValue::Integer(value) => Some(*value as f64),
            MetadataValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<f32> for MetadataValue {
    fn from(value: f32) -> Self {
        MetadataValue::Float(f64::from(value))
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        MetadataValue::Integer(i64::from(value))
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

/// Metadata store for a node or edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    data: HashMap<String, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value stored under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.data.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`Metadata::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.data.get(key)
    }

    /// Numeric value under `key`, if present and numeric.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(MetadataValue::as_f64)
    }

    /// Text value under `key`, if present and textual.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.data.remove(key)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
