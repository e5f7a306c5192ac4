// ctxlog/src/config.rs
//
// Environment-driven logger configuration

use std::env;

use crate::errors::ConfigError;
use crate::logging::{format_json, format_terminal, format_text, with_debug, with_format, LogOption};

/// Environment variable enabling debug mode
pub const DEBUG_VAR: &str = "CTXLOG_DEBUG";
/// Environment variable selecting the output format
pub const FORMAT_VAR: &str = "CTXLOG_FORMAT";

/// Built-in output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Terminal,
    Text,
    Json,
}

impl Format {
    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" | "term" => Ok(Format::Terminal),
            "text" | "logfmt" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Logger settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub debug: bool,
    pub format: Format,
}

impl Config {
    /// Read `CTXLOG_DEBUG` and `CTXLOG_FORMAT`. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an injected variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup(DEBUG_VAR) {
            config.debug = parse_bool(DEBUG_VAR, &value)?;
        }
        if let Some(value) = lookup(FORMAT_VAR) {
            config.format = Format::parse(&value)?;
        }
        Ok(config)
    }

    /// Options to pass when initializing a context
    pub fn options(&self) -> Vec<LogOption> {
        let format = match self.format {
            Format::Terminal => with_format(format_terminal),
            Format::Text => with_format(format_text),
            Format::Json => with_format(format_json),
        };
        vec![with_debug(self.debug), format]
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name.to_string(), value.to_string())),
    }
}
