//! Session Statistics Aggregation
//!
//! This module maintains the per-session quality-of-experience record from
//! the stream of playback lifecycle events. The aggregator is deliberately
//! forgiving: handlers never fail, events arriving before a session starts
//! are ignored, and degenerate numeric payloads (e.g. a zero-length
//! buffering window) flow into the record as non-finite values rather than
//! being rejected. Telemetry must never take the pipeline down with it.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::events::PlaybackEvent;
use crate::playback::{PlaybackContext, NO_LEVEL_CAP};

pub mod record;

pub use record::{SessionStats, TECHNOLOGY};

/// Mode of the most recent fragment-change event.
///
/// Kept separately from the record so that a level reselection within a mode
/// can be told apart from an auto/manual mode transition; the switch
/// counters must only fire on the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelMode {
    /// Level was chosen by the ABR algorithm
    Auto,
    /// Level was forced by the user or host application
    Manual,
}

/// Incremental aggregator for playback session statistics.
///
/// Owns at most one [`SessionStats`] record (none before the first parsed
/// manifest) plus the exact running sums backing the rounded averages.
/// Idle → Active happens only on [`on_manifest_parsed`]; a second parsed
/// manifest replaces the record in place, discarding the prior session.
///
/// [`on_manifest_parsed`]: StatsAggregator::on_manifest_parsed
pub struct StatsAggregator {
    record: Option<SessionStats>,

    // Exact sums, kept apart from the rounded record fields so rounding
    // error never compounds across updates.
    sum_auto_level: f64,
    sum_latency: f64,
    sum_kbps: f64,

    prev_mode: Option<LevelMode>,

    playback: Option<Arc<dyn PlaybackContext>>,
}

impl StatsAggregator {
    /// Create an aggregator with no active session
    pub fn new() -> Self {
        StatsAggregator {
            record: None,
            sum_auto_level: 0.0,
            sum_latency: 0.0,
            sum_kbps: 0.0,
            prev_mode: None,
            playback: None,
        }
    }

    /// Bind the source of live playback-position and capping reads
    pub fn attach_playback_context(&mut self, ctx: Arc<dyn PlaybackContext>) {
        self.playback = Some(ctx);
    }

    /// Unbind the playback context; subsequent snapshots omit `lastPos`
    pub fn detach_playback_context(&mut self) {
        self.playback = None;
    }

    /// Whether a session is active (a manifest has been parsed)
    pub fn is_active(&self) -> bool {
        self.record.is_some()
    }

    /// Dispatch one playback event to the matching handler.
    ///
    /// The capping level for buffer events is sampled from the attached
    /// playback context at this point; with no context attached the
    /// conventional "no cap" value is recorded.
    pub fn handle_event(&mut self, event: &PlaybackEvent) {
        trace!(?event, "aggregating playback event");
        match event {
            PlaybackEvent::ManifestParsed { levels } => self.on_manifest_parsed(levels.len()),
            PlaybackEvent::FragmentChanged { frag } => {
                self.on_fragment_changed(frag.level, frag.auto_level)
            }
            PlaybackEvent::FragmentBuffered { stats } => {
                let capping = self
                    .playback
                    .as_ref()
                    .map(|ctx| ctx.auto_level_capping())
                    .unwrap_or(NO_LEVEL_CAP);
                self.on_fragment_buffered(
                    stats.trequest,
                    stats.tfirst,
                    stats.tbuffered,
                    stats.length,
                    capping,
                );
            }
            PlaybackEvent::FragmentLoadTimeout => self.on_fragment_load_timeout(),
            PlaybackEvent::FragmentLoadError => self.on_fragment_load_error(),
            PlaybackEvent::FpsDrop {
                total_dropped_frames,
            } => self.on_fps_drop(*total_dropped_frames),
        }
    }

    /// Start a new session: fresh record, cleared accumulators and mode flag.
    ///
    /// This is the only reset point; all stats from the previous session are
    /// discarded.
    pub fn on_manifest_parsed(&mut self, level_count: usize) {
        debug!(level_count, "manifest parsed, resetting session stats");
        self.record = Some(SessionStats::new(level_count));
        self.sum_auto_level = 0.0;
        self.sum_latency = 0.0;
        self.sum_kbps = 0.0;
        self.prev_mode = None;
    }

    /// Record a fragment change at `level`, chosen automatically or manually.
    ///
    /// No-op before the first parsed manifest.
    pub fn on_fragment_changed(&mut self, level: i32, auto_level: bool) {
        let Some(record) = self.record.as_mut() else {
            return;
        };

        if record.level_start.is_none() {
            record.level_start = Some(level);
        }

        if auto_level {
            let count = if let Some(prev_count) = record.frag_changed_auto {
                record.auto_level_min = record.auto_level_min.map(|m| m.min(level));
                record.auto_level_max = record.auto_level_max.map(|m| m.max(level));
                // A switch is a reselection while staying in auto mode; the
                // event where the mode itself flips never counts.
                if self.prev_mode == Some(LevelMode::Auto)
                    && record.auto_level_last != Some(level)
                {
                    record.auto_level_switch = record.auto_level_switch.map(|s| s + 1);
                }
                prev_count + 1
            } else {
                record.auto_level_min = Some(level);
                record.auto_level_max = Some(level);
                record.auto_level_switch = Some(0);
                self.sum_auto_level = 0.0;
                1
            };
            record.frag_changed_auto = Some(count);
            self.sum_auto_level += level as f64;
            record.auto_level_avg =
                Some((1000.0 * self.sum_auto_level / count as f64).round() / 1000.0);
            record.auto_level_last = Some(level);
        } else {
            let count = if let Some(prev_count) = record.frag_changed_manual {
                record.manual_level_min = record.manual_level_min.map(|m| m.min(level));
                record.manual_level_max = record.manual_level_max.map(|m| m.max(level));
                if self.prev_mode == Some(LevelMode::Manual)
                    && record.manual_level_last != Some(level)
                {
                    record.manual_level_switch = record.manual_level_switch.map(|s| s + 1);
                }
                prev_count + 1
            } else {
                record.manual_level_min = Some(level);
                record.manual_level_max = Some(level);
                record.manual_level_switch = Some(0);
                1
            };
            record.frag_changed_manual = Some(count);
            record.manual_level_last = Some(level);
        }

        self.prev_mode = Some(if auto_level {
            LevelMode::Auto
        } else {
            LevelMode::Manual
        });
    }

    /// Record a buffered fragment from its load timing and size.
    ///
    /// `capping` is the auto-level cap in force when the fragment finished
    /// buffering. Latency is `tfirst - trequest`; download bitrate is
    /// `8 * length / (tbuffered - tfirst)` in kbps. A zero-length buffering
    /// window yields a non-finite bitrate which propagates into min/max/avg
    /// unchanged. No-op before the first parsed manifest.
    pub fn on_fragment_buffered(
        &mut self,
        trequest: f64,
        tfirst: f64,
        tbuffered: f64,
        length: u64,
        capping: i32,
    ) {
        let Some(record) = self.record.as_mut() else {
            return;
        };

        let latency = tfirst - trequest;
        let bitrate = (8.0 * length as f64 / (tbuffered - tfirst)).round();

        let count = if let Some(prev_count) = record.frag_buffered {
            record.frag_min_latency = record.frag_min_latency.map(|m| m.min(latency));
            record.frag_max_latency = record.frag_max_latency.map(|m| m.max(latency));
            record.frag_min_kbps = record.frag_min_kbps.map(|m| m.min(bitrate));
            record.frag_max_kbps = record.frag_max_kbps.map(|m| m.max(bitrate));
            record.auto_level_capping_min =
                record.auto_level_capping_min.map(|m| m.min(capping));
            record.auto_level_capping_max =
                record.auto_level_capping_max.map(|m| m.max(capping));
            prev_count + 1
        } else {
            record.frag_min_latency = Some(latency);
            record.frag_max_latency = Some(latency);
            record.frag_min_kbps = Some(bitrate);
            record.frag_max_kbps = Some(bitrate);
            record.frag_buffered_bytes = Some(0);
            record.auto_level_capping_min = Some(capping);
            record.auto_level_capping_max = Some(capping);
            self.sum_latency = 0.0;
            self.sum_kbps = 0.0;
            1
        };

        record.frag_buffered = Some(count);
        self.sum_latency += latency;
        self.sum_kbps += bitrate;
        record.frag_buffered_bytes = record.frag_buffered_bytes.map(|b| b + length);
        record.frag_avg_latency = Some((self.sum_latency / count as f64).round());
        record.frag_avg_kbps = Some((self.sum_kbps / count as f64).round());
        record.auto_level_capping_last = Some(capping);
    }

    /// Count a fragment load timeout. No-op before the first parsed manifest.
    pub fn on_fragment_load_timeout(&mut self) {
        if let Some(record) = self.record.as_mut() {
            record.frag_load_timeout = Some(record.frag_load_timeout.unwrap_or(0) + 1);
        }
    }

    /// Count a fragment load error. No-op before the first parsed manifest.
    pub fn on_fragment_load_error(&mut self) {
        if let Some(record) = self.record.as_mut() {
            record.frag_load_error = Some(record.frag_load_error.unwrap_or(0) + 1);
        }
    }

    /// Count a frame-drop event and take over the renderer's running total.
    ///
    /// The total replaces the stored value; the renderer already reports a
    /// cumulative figure. No-op before the first parsed manifest.
    pub fn on_fps_drop(&mut self, total_dropped_frames: u64) {
        if let Some(record) = self.record.as_mut() {
            record.fps_drop_event = Some(record.fps_drop_event.unwrap_or(0) + 1);
            record.fps_total_dropped_frames = Some(total_dropped_frames);
        }
    }

    /// Read the current session stats.
    ///
    /// Returns `None` before the first parsed manifest. When a playback
    /// context is attached, `lastPos` is layered onto the returned copy from
    /// the live position, rounded to 3 decimal places. Never mutates the
    /// record or the accumulators.
    pub fn snapshot(&self) -> Option<SessionStats> {
        let mut stats = self.record.clone()?;
        if let Some(ctx) = &self.playback {
            stats.last_pos = Some((ctx.current_position() * 1000.0).round() / 1000.0);
        }
        Some(stats)
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
