// ctxlog/src/logging/format.rs
//
// Entry formatters

use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Write;
use std::sync::Arc;

use super::entry::Entry;
use super::severity::Severity;

/// Renders an entry into the bytes handed to the writer
pub type FormatFn = Arc<dyn Fn(&Entry) -> Vec<u8> + Send + Sync>;

const RESET: &str = "\x1b[0m";

fn timestamp(entry: &Entry) -> String {
    entry.time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Colored single-line output for terminals.
///
/// `<color>CODE<reset>[time] message key=value ...`
pub fn format_terminal(entry: &Entry) -> Vec<u8> {
    let mut line = format!(
        "{}{}{}[{}] {}",
        entry.severity.color(),
        entry.severity.code(),
        RESET,
        timestamp(entry),
        entry.message
    );
    for (key, value) in entry.keyvals.pairs() {
        let _ = write!(line, " {}={}", key, value);
    }
    line.push('\n');
    line.into_bytes()
}

/// logfmt output: `time=... level=... msg=... key=value ...`
pub fn format_text(entry: &Entry) -> Vec<u8> {
    let mut line = format!(
        "time={} level={} msg={}",
        timestamp(entry),
        entry.severity.code(),
        quote(&entry.message)
    );
    for (key, value) in entry.keyvals.pairs() {
        let _ = write!(line, " {}={}", quote(key), quote(&value.to_string()));
    }
    line.push('\n');
    line.into_bytes()
}

/// Keys written by [`format_json`] itself
const JSON_RESERVED: [&str; 3] = ["time", "level", "msg"];

#[derive(Serialize)]
struct JsonLine<'a> {
    time: String,
    level: Severity,
    msg: &'a str,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// One JSON object per line: `time`, `level` and `msg`, then the entry's
/// pairs in insertion order. A repeated key keeps its first position and its
/// last value. Pair keys that collide with the fixed fields are written as
/// `fields.<key>`.
pub fn format_json(entry: &Entry) -> Vec<u8> {
    let mut fields = Map::new();
    for (key, value) in entry.keyvals.pairs() {
        let key = if JSON_RESERVED.contains(&key) {
            format!("fields.{}", key)
        } else {
            key.to_string()
        };
        fields.insert(key, value.to_json());
    }
    let line = JsonLine {
        time: timestamp(entry),
        level: entry.severity,
        msg: &entry.message,
        fields,
    };
    match serde_json::to_vec(&line) {
        Ok(mut bytes) => {
            bytes.push(b'\n');
            bytes
        }
        Err(err) => {
            log::warn!("ctxlog: failed to encode log entry: {}", err);
            Vec::new()
        }
    }
}

fn quote(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control());
    if needs_quotes {
        // Debug formatting escapes quotes and control characters
        format!("{:?}", s)
    } else {
        s.to_string()
    }
}
