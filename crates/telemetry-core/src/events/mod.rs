//! Playback Lifecycle Events
//!
//! This module defines the events the media pipeline emits while a stream is
//! playing. The telemetry aggregator consumes them; it never validates them —
//! payload correctness is owned by the pipeline.

use serde::{Deserialize, Serialize};

use streamlens_infra_common::events::bus::Event;

pub mod adapter;

/// One quality level (rendition) advertised by a parsed manifest.
///
/// The aggregator only uses the number of levels; the bitrate is carried for
/// consumers that care about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Nominal bitrate of this rendition, in bits per second
    pub bitrate: u64,
}

/// The fragment a `FragmentChanged` event refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentInfo {
    /// Quality level the fragment was requested at
    pub level: i32,
    /// Whether the level was chosen by the ABR algorithm (auto) or forced
    pub auto_level: bool,
}

/// Load timing and size of a buffered fragment.
///
/// Timestamps are in milliseconds on the pipeline's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentLoadStats {
    /// When the fragment request was issued
    pub trequest: f64,
    /// When the first byte arrived
    pub tfirst: f64,
    /// When the fragment was fully buffered
    pub tbuffered: f64,
    /// Fragment size in bytes
    pub length: u64,
}

/// Playback lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A manifest was parsed; a new playback session begins
    ManifestParsed {
        /// Quality levels the manifest advertises
        levels: Vec<LevelInfo>,
    },

    /// Playback moved to a new fragment
    FragmentChanged {
        /// The fragment now playing
        frag: FragmentInfo,
    },

    /// A fragment finished buffering
    FragmentBuffered {
        /// Load timing and size for the fragment
        stats: FragmentLoadStats,
    },

    /// A fragment load timed out
    FragmentLoadTimeout,

    /// A fragment load failed
    FragmentLoadError,

    /// The renderer dropped frames
    FpsDrop {
        /// Cumulative dropped-frame total as tracked by the renderer
        total_dropped_frames: u64,
    },
}

impl Event for PlaybackEvent {}

impl PlaybackEvent {
    /// Create a manifest-parsed event
    pub fn manifest_parsed(levels: Vec<LevelInfo>) -> Self {
        PlaybackEvent::ManifestParsed { levels }
    }

    /// Create a fragment-changed event
    pub fn fragment_changed(level: i32, auto_level: bool) -> Self {
        PlaybackEvent::FragmentChanged {
            frag: FragmentInfo { level, auto_level },
        }
    }

    /// Create a fragment-buffered event
    pub fn fragment_buffered(trequest: f64, tfirst: f64, tbuffered: f64, length: u64) -> Self {
        PlaybackEvent::FragmentBuffered {
            stats: FragmentLoadStats {
                trequest,
                tfirst,
                tbuffered,
                length,
            },
        }
    }

    /// Create an fps-drop event carrying the renderer's running total
    pub fn fps_drop(total_dropped_frames: u64) -> Self {
        PlaybackEvent::FpsDrop {
            total_dropped_frames,
        }
    }
}
