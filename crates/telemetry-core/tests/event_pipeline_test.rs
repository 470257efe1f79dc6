//! End-to-end test: playback events published on the bus flow through the
//! adapter into the aggregated session snapshot.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use streamlens_infra_common::events::bus::EventBus;
use streamlens_infra_common::events::config::EventBusConfig;
use streamlens_telemetry_core::{
    LevelInfo, PlaybackContext, PlaybackEvent, SessionStats, StatsEventAdapter,
};

struct TestPlayer {
    position_ms: AtomicI32,
    capping: AtomicI32,
}

impl TestPlayer {
    fn new() -> Self {
        Self {
            position_ms: AtomicI32::new(0),
            capping: AtomicI32::new(-1),
        }
    }
}

impl PlaybackContext for TestPlayer {
    fn current_position(&self) -> f64 {
        self.position_ms.load(Ordering::Relaxed) as f64 / 1000.0
    }

    fn auto_level_capping(&self) -> i32 {
        self.capping.load(Ordering::Relaxed)
    }
}

/// Poll the adapter until the snapshot satisfies `pred` or a timeout expires.
async fn wait_for_snapshot(
    adapter: &StatsEventAdapter,
    pred: impl Fn(&SessionStats) -> bool,
) -> SessionStats {
    for _ in 0..200 {
        if let Some(stats) = adapter.snapshot() {
            if pred(&stats) {
                return stats;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("snapshot did not reach expected state in time");
}

fn three_levels() -> Vec<LevelInfo> {
    vec![
        LevelInfo { bitrate: 500_000 },
        LevelInfo { bitrate: 1_500_000 },
        LevelInfo { bitrate: 4_000_000 },
    ]
}

#[tokio::test]
async fn test_full_session_through_bus() {
    let bus: EventBus<PlaybackEvent> = EventBus::new(EventBusConfig::new("pipeline-test"));
    let adapter = StatsEventAdapter::new(bus.clone());

    let player = Arc::new(TestPlayer::new());
    adapter
        .aggregator()
        .lock()
        .unwrap()
        .attach_playback_context(player.clone());

    adapter.start().expect("failed to start adapter");

    // Events published before any manifest must be tolerated and ignored.
    bus.publish(PlaybackEvent::FragmentLoadError);
    bus.publish(PlaybackEvent::fragment_changed(1, true));

    bus.publish(PlaybackEvent::manifest_parsed(three_levels()));
    bus.publish(PlaybackEvent::fragment_changed(0, true));
    bus.publish(PlaybackEvent::fragment_changed(2, true));
    bus.publish(PlaybackEvent::fragment_buffered(0.0, 100.0, 200.0, 12_500));
    bus.publish(PlaybackEvent::fragment_buffered(50.0, 200.0, 450.0, 50_000));
    bus.publish(PlaybackEvent::FragmentLoadTimeout);
    bus.publish(PlaybackEvent::fps_drop(4));

    player.position_ms.store(7_250, Ordering::Relaxed);

    let stats = wait_for_snapshot(&adapter, |s| s.fps_drop_event == Some(1)).await;

    assert_eq!(stats.level_count, Some(3));
    assert_eq!(stats.level_start, Some(0));
    assert_eq!(stats.frag_changed_auto, Some(2));
    assert_eq!(stats.auto_level_min, Some(0));
    assert_eq!(stats.auto_level_max, Some(2));
    assert_eq!(stats.auto_level_switch, Some(1));
    assert_eq!(stats.auto_level_avg, Some(1.0));

    assert_eq!(stats.frag_buffered, Some(2));
    assert_eq!(stats.frag_buffered_bytes, Some(62_500));
    assert_eq!(stats.frag_min_latency, Some(100.0));
    assert_eq!(stats.frag_max_latency, Some(150.0));
    assert_eq!(stats.frag_avg_latency, Some(125.0));
    // 8*12500/100 = 1000, 8*50000/250 = 1600
    assert_eq!(stats.frag_min_kbps, Some(1000.0));
    assert_eq!(stats.frag_max_kbps, Some(1600.0));
    assert_eq!(stats.frag_avg_kbps, Some(1300.0));

    assert_eq!(stats.frag_load_timeout, Some(1));
    // the pre-session error event was dropped
    assert_eq!(stats.frag_load_error, None);
    assert_eq!(stats.fps_total_dropped_frames, Some(4));

    assert_eq!(stats.last_pos, Some(7.25));

    adapter.stop();
}

#[tokio::test]
async fn test_second_manifest_resets_session() {
    let bus: EventBus<PlaybackEvent> = EventBus::new_default();
    let adapter = StatsEventAdapter::new(bus.clone());
    adapter.start().expect("failed to start adapter");

    bus.publish(PlaybackEvent::manifest_parsed(three_levels()));
    bus.publish(PlaybackEvent::fragment_changed(1, false));
    bus.publish(PlaybackEvent::FragmentLoadError);
    wait_for_snapshot(&adapter, |s| s.frag_load_error == Some(1)).await;

    bus.publish(PlaybackEvent::manifest_parsed(vec![LevelInfo {
        bitrate: 800_000,
    }]));
    let stats = wait_for_snapshot(&adapter, |s| s.level_count == Some(1)).await;

    assert_eq!(stats.level_start, None);
    assert_eq!(stats.frag_changed_manual, None);
    assert_eq!(stats.frag_load_error, None);

    adapter.stop();
}

#[tokio::test]
async fn test_snapshot_serializes_lazily() {
    let bus: EventBus<PlaybackEvent> = EventBus::new_default();
    let adapter = StatsEventAdapter::new(bus.clone());
    adapter.start().expect("failed to start adapter");

    bus.publish(PlaybackEvent::manifest_parsed(three_levels()));
    let stats = wait_for_snapshot(&adapter, |s| s.level_count == Some(3)).await;

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"technology": "hls", "levelCount": 3})
    );

    bus.publish(PlaybackEvent::FragmentLoadTimeout);
    let stats = wait_for_snapshot(&adapter, |s| s.frag_load_timeout == Some(1)).await;
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["fragLoadTimeout"], 1);
    assert!(json.get("fragLoadError").is_none());

    adapter.stop();
}
