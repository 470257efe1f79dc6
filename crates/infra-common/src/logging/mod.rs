//! Logging setup built on `tracing`.

pub mod setup;

pub use setup::{parse_log_level, setup_logging, LoggingConfig};
