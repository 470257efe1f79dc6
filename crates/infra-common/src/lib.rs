//! Common infrastructure for the Streamlens stack.
//!
//! This crate provides the shared plumbing the higher layers build on:
//!
//! - [`events`]: an in-process typed event bus for pipeline lifecycle events
//! - [`logging`]: tracing-based logging setup
//! - [`errors`]: the common error type for infrastructure operations

pub mod errors;
pub mod events;
pub mod logging;

pub use errors::types::{Error, Result};
pub use events::bus::{Event, EventBus};
pub use events::config::EventBusConfig;
pub use logging::setup::{setup_logging, LoggingConfig};
