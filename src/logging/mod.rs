// Request-scoped logging for ctxlog
//
// This module provides the context logger:
// - A per-request logger state bound to a Context under one reserved key
// - Deferred emission: entries are buffered until an error or an explicit flush
// - Debug mode, which turns buffering off for real-time output
// - Key/value prefixes shared by every entry logged on a context

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::context::Context;
use crate::types::KeyVals;

pub mod entry;
pub mod format;
pub mod options;
pub mod severity;
pub mod writer;

pub use entry::Entry;
pub use format::{format_json, format_terminal, format_text, FormatFn};
pub use options::{with_clock, with_debug, with_format, with_writer, ClockFn, LogOption, Options};
pub use severity::Severity;
pub use writer::{MemoryWriter, Writer};

/// Context key under which the logger state is stored
pub const LOGGER_KEY: &str = "ctxlog.logger";

/// An entry waiting in the buffer. Only the call-site pairs are kept: the
/// context prefix is read when the entry is written out.
struct Pending {
    time: DateTime<Utc>,
    severity: Severity,
    keyvals: KeyVals,
    message: String,
}

enum Phase {
    Buffering(Vec<Pending>),
    /// Terminal: nothing is buffered once here.
    Flushed,
}

struct State {
    options: Options,
    keyvals: KeyVals,
    phase: Phase,
}

impl State {
    fn render(&self, pending: Pending) -> Entry {
        let mut keyvals = self.keyvals.clone();
        keyvals.extend(pending.keyvals);
        Entry::new(pending.time, pending.severity, keyvals, pending.message)
    }

    fn flush(&mut self) {
        if let Phase::Buffering(entries) = std::mem::replace(&mut self.phase, Phase::Flushed) {
            for pending in entries {
                let entry = self.render(pending);
                self.options.emit(&entry);
            }
        }
    }

    fn log(&mut self, severity: Severity, buffer: bool, message: String, mut keyvals: KeyVals) {
        if !self.options.debug && severity == Severity::Debug {
            return;
        }
        if self.options.debug {
            self.flush();
        }

        keyvals.pad();
        let pending = Pending {
            time: (self.options.clock)(),
            severity,
            keyvals,
            message,
        };
        if buffer {
            if let Phase::Buffering(entries) = &mut self.phase {
                entries.push(pending);
                return;
            }
        }
        let entry = self.render(pending);
        self.options.emit(&entry);
    }
}

/// Logger state shared by every holder of a context it is bound to
struct LoggerState {
    id: Uuid,
    state: Mutex<State>,
}

impl LoggerState {
    fn lock(&self) -> MutexGuard<'_, State> {
        // Recover from poisoning left by a panicking formatter or writer
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A handle to a logger state.
///
/// Clones share the same state. Most code reaches the logger through a
/// [`Context`] with the free functions of this module; the handle is for code
/// that prefers to pass the logger explicitly.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerState>,
}

impl Logger {
    /// Create a new logger state with default options plus `options`
    pub fn new(options: impl IntoIterator<Item = LogOption>) -> Self {
        let mut opts = Options::default();
        for option in options {
            opts.apply(option);
        }
        Self {
            inner: Arc::new(LoggerState {
                id: Uuid::new_v4(),
                state: Mutex::new(State {
                    options: opts,
                    keyvals: KeyVals::new(),
                    phase: Phase::Buffering(Vec::new()),
                }),
            }),
        }
    }

    /// Get the logger from a context, if one is bound
    pub fn from_context(ctx: &Context) -> Option<Self> {
        ctx.value::<LoggerState>(LOGGER_KEY)
            .map(|inner| Self { inner })
    }

    /// Derive a context from `ctx` carrying this logger
    pub fn attach(&self, ctx: &Context) -> Context {
        ctx.with_arc(LOGGER_KEY, self.inner.clone())
    }

    /// Merge options into the current settings
    pub fn configure(&self, options: impl IntoIterator<Item = LogOption>) {
        let mut state = self.inner.lock();
        for option in options {
            state.options.apply(option);
        }
    }

    /// Identity of the underlying state
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Whether both handles share one state
    pub fn same_state(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn is_debug(&self) -> bool {
        self.inner.lock().options.debug
    }

    pub fn is_flushed(&self) -> bool {
        matches!(self.inner.lock().phase, Phase::Flushed)
    }

    /// Number of entries waiting in the buffer
    pub fn pending(&self) -> usize {
        match &self.inner.lock().phase {
            Phase::Buffering(entries) => entries.len(),
            Phase::Flushed => 0,
        }
    }

    /// Append pairs to the prefix shared by all entries of this logger
    pub fn with(&self, keyvals: impl Into<KeyVals>) {
        let mut keyvals = keyvals.into();
        keyvals.pad();
        self.inner.lock().keyvals.extend(keyvals);
    }

    pub fn log(
        &self,
        severity: Severity,
        buffer: bool,
        message: impl Into<String>,
        keyvals: impl Into<KeyVals>,
    ) {
        self.inner
            .lock()
            .log(severity, buffer, message.into(), keyvals.into());
    }

    pub fn debug(&self, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
        self.log(Severity::Debug, true, message, keyvals);
    }

    pub fn info(&self, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
        self.log(Severity::Info, true, message, keyvals);
    }

    /// Log an info message, written immediately regardless of buffering
    pub fn print(&self, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
        self.log(Severity::Info, false, message, keyvals);
    }

    /// Flush the buffer, then log an error message
    pub fn error(&self, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
        let mut state = self.inner.lock();
        state.flush();
        state.log(Severity::Error, true, message.into(), keyvals.into());
    }

    /// Write out every buffered entry in order; later entries are written
    /// immediately. Does nothing the second time.
    pub fn flush(&self) {
        self.inner.lock().flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Logger")
            .field("id", &self.inner.id)
            .field("debug", &state.options.debug)
            .field("flushed", &matches!(state.phase, Phase::Flushed))
            .finish()
    }
}

/// Initialize logging on a context.
///
/// If `ctx` already carries a logger, the same state is reused and `options`
/// are merged into it, so buffered entries and prefixes survive.
pub fn context(ctx: &Context, options: impl IntoIterator<Item = LogOption>) -> Context {
    match Logger::from_context(ctx) {
        Some(logger) => {
            logger.configure(options);
            logger.attach(ctx)
        }
        None => Logger::new(options).attach(ctx),
    }
}

/// Get the logger bound to a context
pub fn logger(ctx: &Context) -> Option<Logger> {
    Logger::from_context(ctx)
}

/// Add key/value pairs to the context prefix. Returns the context unchanged.
pub fn with(ctx: &Context, keyvals: impl Into<KeyVals>) -> Context {
    if let Some(logger) = Logger::from_context(ctx) {
        logger.with(keyvals);
    }
    ctx.clone()
}

/// Log a message. Does nothing when no logger is bound.
pub fn log(
    ctx: &Context,
    severity: Severity,
    buffer: bool,
    message: impl Into<String>,
    keyvals: impl Into<KeyVals>,
) {
    if let Some(logger) = Logger::from_context(ctx) {
        logger.log(severity, buffer, message, keyvals);
    }
}

/// Log a debug message; dropped unless debug mode is on
pub fn debug(ctx: &Context, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
    log(ctx, Severity::Debug, true, message, keyvals);
}

/// Log a buffered info message
pub fn info(ctx: &Context, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
    log(ctx, Severity::Info, true, message, keyvals);
}

/// Log an info message immediately, ignoring buffering
pub fn print(ctx: &Context, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
    log(ctx, Severity::Info, false, message, keyvals);
}

/// Flush buffered entries, then log an error message
pub fn error(ctx: &Context, message: impl Into<String>, keyvals: impl Into<KeyVals>) {
    if let Some(logger) = Logger::from_context(ctx) {
        logger.error(message, keyvals);
    }
}

/// Write out buffered entries and switch the context to immediate output
pub fn flush(ctx: &Context) {
    if let Some(logger) = Logger::from_context(ctx) {
        logger.flush();
    }
}

/// Logging helpers for types that carry a request context
pub trait LoggingContext {
    /// Get the context
    fn context(&self) -> &Context;

    /// Log at debug level
    fn log_debug(&self, message: &str, keyvals: KeyVals) {
        debug(self.context(), message, keyvals);
    }

    /// Log at info level
    fn log_info(&self, message: &str, keyvals: KeyVals) {
        info(self.context(), message, keyvals);
    }

    /// Log at info level, unbuffered
    fn log_print(&self, message: &str, keyvals: KeyVals) {
        print(self.context(), message, keyvals);
    }

    /// Log at error level
    fn log_error(&self, message: &str, keyvals: KeyVals) {
        error(self.context(), message, keyvals);
    }

    fn log_flush(&self) {
        flush(self.context());
    }
}

impl LoggingContext for Context {
    fn context(&self) -> &Context {
        self
    }
}
