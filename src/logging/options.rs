// ctxlog/src/logging/options.rs
//
// Logger configuration

use chrono::{DateTime, Utc};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use super::entry::Entry;
use super::format::{self, FormatFn};
use super::writer::{self, Writer};

/// Source of entry timestamps
pub type ClockFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A single configuration change applied when a context is initialized.
///
/// Options are merged into the logger state: initializing a context that
/// already carries a logger only replaces the settings that are given.
pub enum LogOption {
    /// Output sink
    Writer(Writer),
    /// Entry renderer
    Format(FormatFn),
    /// Debug mode: debug entries are kept and nothing is buffered
    Debug(bool),
    /// Timestamp source
    Clock(ClockFn),
}

/// Send rendered entries to `w`
pub fn with_writer<W: Write + Send + 'static>(w: W) -> LogOption {
    LogOption::Writer(Box::new(w))
}

/// Render entries with `f`, e.g. [`format_json`](super::format::format_json)
pub fn with_format<F>(f: F) -> LogOption
where
    F: Fn(&Entry) -> Vec<u8> + Send + Sync + 'static,
{
    LogOption::Format(Arc::new(f))
}

/// Enable or disable debug mode
pub fn with_debug(enabled: bool) -> LogOption {
    LogOption::Debug(enabled)
}

/// Take entry timestamps from `clock` instead of the system time
pub fn with_clock<F>(clock: F) -> LogOption
where
    F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
{
    LogOption::Clock(Arc::new(clock))
}

/// Settings snapshot held by a logger state
pub struct Options {
    pub(crate) writer: Writer,
    pub(crate) format: FormatFn,
    pub(crate) debug: bool,
    pub(crate) clock: ClockFn,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            writer: writer::stdout(),
            format: Arc::new(format::format_terminal),
            debug: false,
            clock: Arc::new(Utc::now),
        }
    }
}

impl Options {
    pub(crate) fn apply(&mut self, option: LogOption) {
        match option {
            LogOption::Writer(w) => self.writer = w,
            LogOption::Format(f) => self.format = f,
            LogOption::Debug(enabled) => self.debug = enabled,
            LogOption::Clock(clock) => self.clock = clock,
        }
    }

    /// Render `entry` and hand it to the writer. Write failures are reported
    /// through the `log` facade and otherwise ignored.
    pub(crate) fn emit(&mut self, entry: &Entry) {
        let bytes = (self.format)(entry);
        if let Err(err) = self.writer.write_all(&bytes) {
            log::warn!("ctxlog: failed to write log entry: {}", err);
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
