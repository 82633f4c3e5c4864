//! Structured logging for docsight.
//!
//! Handles subscriber setup (JSON or pretty console, optional rolling file)
//! and scrubbing of credentials from free-form error text.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LoggerOptions};
pub use redact::redact_sensitive_data;
