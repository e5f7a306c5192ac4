// ctxlog/src/types/value_type.rs
//
// ValueType definition for key/value log attributes

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// ValueType represents a dynamically typed value attached to a log entry.
///
/// Keys and values of a key/value sequence are both ValueTypes, so a caller
/// can pass anything convertible and the logger decides later whether a key
/// is usable.
#[derive(Debug, Clone)]
pub enum ValueType {
    /// JSON value (for values that already come as JSON)
    Json(Value),
    /// HashMap of string keys to ValueType values
    Map(HashMap<String, ValueType>),
    /// Vector of ValueType values
    Array(Vec<ValueType>),
    /// String value
    String(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Null/None value
    Null,
    /// Binary data
    Bytes(Vec<u8>),
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::Json(a), ValueType::Json(b)) => a == b,
            (ValueType::Map(a), ValueType::Map(b)) => a == b,
            (ValueType::Array(a), ValueType::Array(b)) => a == b,
            (ValueType::String(a), ValueType::String(b)) => a == b,
            (ValueType::Number(a), ValueType::Number(b)) => a == b,
            (ValueType::Bool(a), ValueType::Bool(b)) => a == b,
            (ValueType::Null, ValueType::Null) => true,
            (ValueType::Bytes(a), ValueType::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl ValueType {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ValueType::Null)
    }

    /// Convert this ValueType to a JSON Value
    pub fn to_json(&self) -> Value {
        // String keys only, so conversion cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Serializes to the natural JSON shape: integral numbers as integers, bytes
/// as base64, non-finite numbers as null.
impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ValueType::Json(value) => value.serialize(serializer),
            ValueType::Map(map) => serializer.collect_map(map),
            ValueType::Array(items) => serializer.collect_seq(items),
            ValueType::String(s) => serializer.serialize_str(s),
            ValueType::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            ValueType::Number(n) => serializer.serialize_f64(*n),
            ValueType::Bool(b) => serializer.serialize_bool(*b),
            ValueType::Null => serializer.serialize_unit(),
            ValueType::Bytes(b) => serializer.serialize_str(&STANDARD.encode(b)),
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() < 1e15
}

/// Renders the value the way it appears after `key=` in text output.
impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String(s) => f.write_str(s),
            ValueType::Number(n) if is_integral(*n) => write!(f, "{}", *n as i64),
            ValueType::Number(n) => write!(f, "{}", n),
            ValueType::Bool(b) => write!(f, "{}", b),
            ValueType::Null => f.write_str("null"),
            ValueType::Bytes(b) => f.write_str(&STANDARD.encode(b)),
            ValueType::Json(_) | ValueType::Map(_) | ValueType::Array(_) => {
                write!(f, "{}", self.to_json())
            }
        }
    }
}

// Implement From for common types to convert to ValueType
impl From<String> for ValueType {
    fn from(s: String) -> Self {
        ValueType::String(s)
    }
}

impl From<&str> for ValueType {
    fn from(s: &str) -> Self {
        ValueType::String(s.to_string())
    }
}

impl From<&String> for ValueType {
    fn from(s: &String) -> Self {
        ValueType::String(s.clone())
    }
}

impl From<f64> for ValueType {
    fn from(n: f64) -> Self {
        ValueType::Number(n)
    }
}

impl From<f32> for ValueType {
    fn from(n: f32) -> Self {
        ValueType::Number(n as f64)
    }
}

impl From<i32> for ValueType {
    fn from(n: i32) -> Self {
        ValueType::Number(n as f64)
    }
}

impl From<i64> for ValueType {
    fn from(n: i64) -> Self {
        ValueType::Number(n as f64)
    }
}

impl From<u32> for ValueType {
    fn from(n: u32) -> Self {
        ValueType::Number(n as f64)
    }
}

impl From<u64> for ValueType {
    fn from(n: u64) -> Self {
        ValueType::Number(n as f64)
    }
}

impl From<usize> for ValueType {
    fn from(n: usize) -> Self {
        ValueType::Number(n as f64)
    }
}

impl From<bool> for ValueType {
    fn from(b: bool) -> Self {
        ValueType::Bool(b)
    }
}

impl From<Vec<u8>> for ValueType {
    fn from(b: Vec<u8>) -> Self {
        ValueType::Bytes(b)
    }
}

impl From<Vec<ValueType>> for ValueType {
    fn from(v: Vec<ValueType>) -> Self {
        ValueType::Array(v)
    }
}

impl From<Vec<String>> for ValueType {
    fn from(v: Vec<String>) -> Self {
        ValueType::Array(v.into_iter().map(ValueType::from).collect())
    }
}

impl From<Vec<&str>> for ValueType {
    fn from(v: Vec<&str>) -> Self {
        ValueType::Array(v.into_iter().map(ValueType::from).collect())
    }
}

impl<T: Into<ValueType>> From<HashMap<String, T>> for ValueType {
    fn from(m: HashMap<String, T>) -> Self {
        let mut map = HashMap::new();
        for (k, v) in m {
            map.insert(k, v.into());
        }
        ValueType::Map(map)
    }
}

impl<T: Into<ValueType>> From<Option<T>> for ValueType {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => ValueType::Null,
        }
    }
}

impl From<()> for ValueType {
    fn from(_: ()) -> Self {
        ValueType::Null
    }
}

impl From<Value> for ValueType {
    fn from(v: Value) -> Self {
        ValueType::Json(v)
    }
}
