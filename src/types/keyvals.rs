//! KeyVals module for ctxlog
//! Flat, ordered key/value sequences attached to log entries

use crate::types::ValueType;
use std::fmt;

/// Key substituted for any key that is not a string.
pub const INVALID_KEY: &str = "<INVALID>";

static NULL: ValueType = ValueType::Null;

/// An ordered flat sequence of alternating keys and values.
///
/// Duplicate keys are allowed and insertion order is preserved.
#[derive(Clone, Default, PartialEq)]
pub struct KeyVals(Vec<ValueType>);

impl fmt::Debug for KeyVals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl KeyVals {
    /// Create an empty sequence
    pub fn new() -> Self {
        KeyVals(Vec::new())
    }

    /// Number of raw items (keys and values together)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a key and its value
    pub fn push<K: Into<ValueType>, V: Into<ValueType>>(&mut self, key: K, value: V) {
        self.0.push(key.into());
        self.0.push(value.into());
    }

    /// Append all items of `other`, keeping their order
    pub fn extend(&mut self, other: KeyVals) {
        self.0.extend(other.0);
    }

    /// Pad a dangling trailing key with a null value.
    pub fn pad(&mut self) {
        if self.0.len() % 2 != 0 {
            self.0.push(ValueType::Null);
        }
    }

    /// Return the raw items
    pub fn as_slice(&self) -> &[ValueType] {
        &self.0
    }

    /// Split the sequence into parallel keys and values of the same length.
    ///
    /// Keys that are not strings become [`INVALID_KEY`]. A trailing key
    /// without a value is paired with [`ValueType::Null`].
    pub fn parse(&self) -> (Vec<String>, Vec<ValueType>) {
        let pairs = (self.0.len() + 1) / 2;
        let mut keys = Vec::with_capacity(pairs);
        let mut vals = Vec::with_capacity(pairs);
        for chunk in self.0.chunks(2) {
            let key = match &chunk[0] {
                ValueType::String(s) => s.clone(),
                _ => INVALID_KEY.to_string(),
            };
            keys.push(key);
            vals.push(chunk.get(1).cloned().unwrap_or(ValueType::Null));
        }
        (keys, vals)
    }

    /// Iterate over `(key, value)` pairs with the same normalization as [`KeyVals::parse`].
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &ValueType)> {
        self.0.chunks(2).map(|chunk| {
            let key = match &chunk[0] {
                ValueType::String(s) => s.as_str(),
                _ => INVALID_KEY,
            };
            (key, chunk.get(1).unwrap_or(&NULL))
        })
    }
}

impl From<Vec<ValueType>> for KeyVals {
    fn from(items: Vec<ValueType>) -> Self {
        KeyVals(items)
    }
}
