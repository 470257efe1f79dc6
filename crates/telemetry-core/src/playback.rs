//! Playback context abstraction.
//!
//! The aggregator never talks to the player directly; it reads two live
//! values through this trait — the current playback position (for the
//! `lastPos` snapshot field) and the current auto-level cap (sampled on each
//! fragment-buffered event). The implementation is owned by the host
//! application and swapped in and out at will.

/// Capping value meaning "no cap imposed on the auto level"
pub const NO_LEVEL_CAP: i32 = -1;

/// Read-only view of the live player state.
///
/// Implementations must be cheap to call; both methods are sampled on the
/// event-dispatch path.
pub trait PlaybackContext: Send + Sync {
    /// Current playback position in seconds
    fn current_position(&self) -> f64;

    /// Currently imposed upper bound on the auto level, or [`NO_LEVEL_CAP`]
    fn auto_level_capping(&self) -> i32 {
        NO_LEVEL_CAP
    }
}
