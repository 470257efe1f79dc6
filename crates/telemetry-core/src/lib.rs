//! streamlens-telemetry-core: session quality-of-experience telemetry.
//!
//! This crate observes the lifecycle events of an adaptive streaming
//! pipeline and incrementally maintains one statistics record per playback
//! session. It contains:
//!
//! - Event model: [`events`] — the playback lifecycle events and the bus
//!   adapter that feeds them to the aggregator
//! - Aggregation: [`stats`] — the session record and the incremental
//!   aggregator
//! - Player seam: [`playback`] — the read-only context the host supplies for
//!   live position and capping reads
//!
//! The aggregator is an in-process observability component: it consumes
//! events, never emits them, and exposes a single snapshot read. How and
//! where the snapshot surfaces (polling, end-of-session logging) is the host
//! application's decision.

pub mod error;
pub mod events;
pub mod playback;
pub mod stats;

pub use error::{Error, Result};
pub use events::adapter::StatsEventAdapter;
pub use events::{FragmentInfo, FragmentLoadStats, LevelInfo, PlaybackEvent};
pub use playback::{PlaybackContext, NO_LEVEL_CAP};
pub use stats::{LevelMode, SessionStats, StatsAggregator, TECHNOLOGY};
