//! The session statistics record.
//!
//! One record exists per playback session (manifest parse to manifest
//! parse). Every metric field is optional and stays `None` until the first
//! contributing event arrives, so a serialized snapshot contains exactly the
//! metrics that have been observed — a fresh session serializes to
//! `{"technology":"hls","levelCount":N}` and grows from there.

use serde::{Deserialize, Serialize};

/// Fixed technology tag carried in every record
pub const TECHNOLOGY: &str = "hls";

/// Aggregated quality-of-experience statistics for one playback session.
///
/// Min/max pairs are only meaningful once their paired count is at least 1;
/// averages are recomputed from exact sums held by the aggregator, never from
/// previously rounded values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionStats {
    /// Descriptive technology tag, always [`TECHNOLOGY`]
    pub technology: String,

    /// Number of quality levels in the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_count: Option<usize>,

    /// Level of the first fragment played; set once, never overwritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_start: Option<i32>,

    // --- auto-mode level stats ---
    /// Number of fragment changes while in auto (ABR) mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_changed_auto: Option<u64>,
    /// Lowest level seen in auto mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_min: Option<i32>,
    /// Highest level seen in auto mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_max: Option<i32>,
    /// Level reselections while staying in auto mode (mode transitions do
    /// not count)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_switch: Option<u64>,
    /// Running mean of auto-mode levels, rounded to 3 decimal places
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_avg: Option<f64>,
    /// Last level seen in auto mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_last: Option<i32>,

    // --- manual-mode mirror set (no running average is kept) ---
    /// Number of fragment changes while in manual mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_changed_manual: Option<u64>,
    /// Lowest level seen in manual mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_level_min: Option<i32>,
    /// Highest level seen in manual mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_level_max: Option<i32>,
    /// Level reselections while staying in manual mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_level_switch: Option<u64>,
    /// Last level seen in manual mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_level_last: Option<i32>,

    // --- buffering stats ---
    /// Number of fragments buffered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_buffered: Option<u64>,
    /// Cumulative bytes buffered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_buffered_bytes: Option<u64>,
    /// Lowest request-to-first-byte latency observed, in ms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_min_latency: Option<f64>,
    /// Highest request-to-first-byte latency observed, in ms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_max_latency: Option<f64>,
    /// Rounded running mean latency, in ms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_avg_latency: Option<f64>,
    /// Lowest observed fragment download bitrate, in kbps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_min_kbps: Option<f64>,
    /// Highest observed fragment download bitrate, in kbps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_max_kbps: Option<f64>,
    /// Rounded running mean download bitrate, in kbps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_avg_kbps: Option<f64>,
    /// Lowest auto-level cap sampled on buffer events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_capping_min: Option<i32>,
    /// Highest auto-level cap sampled on buffer events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_capping_max: Option<i32>,
    /// Auto-level cap sampled on the most recent buffer event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_level_capping_last: Option<i32>,

    // --- error/timeout counters ---
    /// Fragment load timeouts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_load_timeout: Option<u64>,
    /// Fragment load errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frag_load_error: Option<u64>,

    // --- frame-drop stats ---
    /// Number of frame-drop events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps_drop_event: Option<u64>,
    /// Renderer's cumulative dropped-frame total as of the last drop event
    /// (overwritten, not summed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps_total_dropped_frames: Option<u64>,

    /// Current playback position in seconds, rounded to 3 decimal places.
    /// Only populated on snapshots taken while a playback context is
    /// attached; never maintained by the event handlers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pos: Option<f64>,
}

impl SessionStats {
    /// Create the record for a new session
    pub fn new(level_count: usize) -> Self {
        SessionStats {
            technology: TECHNOLOGY.to_string(),
            level_count: Some(level_count),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let stats = SessionStats::new(4);
        assert_eq!(stats.technology, TECHNOLOGY);
        assert_eq!(stats.level_count, Some(4));
        assert_eq!(stats.level_start, None);
        assert_eq!(stats.frag_buffered, None);
    }

    #[test]
    fn test_fresh_record_serializes_minimally() {
        let stats = SessionStats::new(3);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"technology": "hls", "levelCount": 3})
        );
    }

    #[test]
    fn test_camel_case_field_names() {
        let mut stats = SessionStats::new(2);
        stats.level_start = Some(1);
        stats.frag_changed_auto = Some(5);
        stats.auto_level_avg = Some(3.4);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["levelStart"], 1);
        assert_eq!(json["fragChangedAuto"], 5);
        assert_eq!(json["autoLevelAvg"], 3.4);
    }
}
