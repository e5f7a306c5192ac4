// ctxlog/src/logging/entry.rs
//
// A single log record

use chrono::{DateTime, Utc};

use super::severity::Severity;
use crate::types::KeyVals;

/// One log record handed to a formatter.
///
/// `keyvals` holds the context prefix followed by the call-site pairs, with
/// any dangling key already padded.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub time: DateTime<Utc>,
    pub severity: Severity,
    pub keyvals: KeyVals,
    pub message: String,
}

impl Entry {
    pub fn new(
        time: DateTime<Utc>,
        severity: Severity,
        keyvals: KeyVals,
        message: impl Into<String>,
    ) -> Self {
        Self {
            time,
            severity,
            keyvals,
            message: message.into(),
        }
    }
}
