//! Error types for the telemetry core.
//!
//! The aggregator itself has no failure path: handlers tolerate missing
//! records and degenerate payloads silently. Errors only arise from the
//! adapter lifecycle around it.

use thiserror::Error;

/// Result type for telemetry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Telemetry error type
#[derive(Debug, Error)]
pub enum Error {
    /// `start` was called on an adapter that is already running
    #[error("stats event adapter is already running")]
    AlreadyRunning,

    /// Infrastructure failure (event bus, logging)
    #[error(transparent)]
    Infra(#[from] streamlens_infra_common::Error),
}
