//! Structured logging setup and ndjson output.

mod format;

pub use format::{StructuredLogger, WindowRecord};
