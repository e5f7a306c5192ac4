// ctxlog/src/types/mod.rs
//
// Value types carried by log entries

mod keyvals;
mod value_type;

// Re-export types
pub use keyvals::{KeyVals, INVALID_KEY};
pub use value_type::ValueType;
