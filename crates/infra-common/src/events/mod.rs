//! In-process event system.
//!
//! Components communicate through a typed broadcast bus: producers publish
//! events, any number of consumers subscribe and receive their own copy.
//! Publishing never fails the producer — telemetry and other observers must
//! not be able to stall the media pipeline.

pub mod bus;
pub mod config;

pub use bus::{Event, EventBus};
pub use config::EventBusConfig;
