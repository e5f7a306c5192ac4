// ctxlog/src/lib.rs
//
// Request-scoped structured logging with deferred emission

// Export modules
pub mod config;
pub mod context;
pub mod errors;
pub mod logging;
pub mod macros;
pub mod scope;
pub mod types;

// Re-export the context logger API at the root level
pub use context::{CancelHandle, Context};
pub use logging::{
    context, debug, error, flush, info, log, logger, print, with, Entry, Logger, LoggingContext,
    Severity,
};
pub use types::{KeyVals, ValueType};
