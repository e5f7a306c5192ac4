//! Error types for ctxlog
//!
//! Logging itself never fails: every logging operation degrades instead of
//! returning an error. The only fallible surface is reading configuration.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{0}': {1}")]
    InvalidValue(String, String),

    /// Unknown output format name
    #[error("Unknown log format '{0}' (expected terminal, text or json)")]
    UnknownFormat(String),
}
