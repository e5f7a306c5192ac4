// ctxlog/src/logging/severity.rs
//
// Log severity levels

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Severity of a log entry, ordered from least to most important
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Error,
}

impl Severity {
    /// Get the display name of the severity
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
        }
    }

    /// Get the fixed 4-character code of the severity
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBG",
            Severity::Info => "INFO",
            Severity::Error => "ERRO",
        }
    }

    /// Get the terminal escape sequence that colors output for the severity
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Debug => "\x1b[37m",
            Severity::Info => "\x1b[34m",
            Severity::Error => "\x1b[1;31m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" | "DEBG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "ERROR" | "ERRO" => Ok(Severity::Error),
            _ => Err(ConfigError::InvalidValue(
                "severity".to_string(),
                s.to_string(),
            )),
        }
    }
}

/// Serialized as the display name, e.g. `"ERROR"`
impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
