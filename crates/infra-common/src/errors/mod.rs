//! Error types for infrastructure components.

pub mod types;

pub use types::{Error, Result};
