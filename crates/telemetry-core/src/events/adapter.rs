//! Stats Event Adapter
//!
//! Binds a [`StatsAggregator`] to the playback event bus. The adapter
//! subscribes on `start`, drives every received event through the aggregator
//! on a single dispatch task (events are processed one at a time, so the
//! aggregator needs no internal synchronization of its own), and
//! unsubscribes on `stop`. Stopping has no other side effects — no stats are
//! persisted or flushed anywhere.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use streamlens_infra_common::events::bus::EventBus;

use crate::error::{Error, Result};
use crate::events::PlaybackEvent;
use crate::stats::{SessionStats, StatsAggregator};

/// Connects the stats aggregator to an [`EventBus`] of playback events.
pub struct StatsEventAdapter {
    bus: EventBus<PlaybackEvent>,
    aggregator: Arc<Mutex<StatsAggregator>>,
    dispatch_task: Mutex<Option<JoinHandle<()>>>,
}

impl StatsEventAdapter {
    /// Create an adapter with a fresh aggregator
    pub fn new(bus: EventBus<PlaybackEvent>) -> Self {
        Self::with_aggregator(bus, Arc::new(Mutex::new(StatsAggregator::new())))
    }

    /// Create an adapter around an existing shared aggregator
    pub fn with_aggregator(
        bus: EventBus<PlaybackEvent>,
        aggregator: Arc<Mutex<StatsAggregator>>,
    ) -> Self {
        Self {
            bus,
            aggregator,
            dispatch_task: Mutex::new(None),
        }
    }

    /// Subscribe to the bus and start dispatching events.
    ///
    /// Fails with [`Error::AlreadyRunning`] if called twice without an
    /// intervening [`stop`](Self::stop).
    pub fn start(&self) -> Result<()> {
        let mut task = self.dispatch_task.lock().unwrap();
        if task.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let mut receiver = self.bus.subscribe();
        let aggregator = self.aggregator.clone();

        *task = Some(tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        aggregator.lock().unwrap().handle_event(&event);
                    }
                    Err(RecvError::Lagged(missed)) => {
                        // Degraded data, never a failure: keep aggregating
                        // whatever still arrives.
                        warn!(missed, "stats aggregation lagging, events lost");
                    }
                    Err(RecvError::Closed) => {
                        debug!("playback event bus closed, ending stats dispatch");
                        break;
                    }
                }
            }
        }));

        info!("stats event adapter started");
        Ok(())
    }

    /// Unsubscribe from the bus and stop dispatching.
    ///
    /// Idempotent; the aggregated record stays readable after stopping.
    pub fn stop(&self) {
        if let Some(task) = self.dispatch_task.lock().unwrap().take() {
            task.abort();
            info!("stats event adapter stopped");
        }
    }

    /// Whether the dispatch task is currently subscribed
    pub fn is_running(&self) -> bool {
        self.dispatch_task.lock().unwrap().is_some()
    }

    /// The shared aggregator driven by this adapter
    pub fn aggregator(&self) -> Arc<Mutex<StatsAggregator>> {
        self.aggregator.clone()
    }

    /// Convenience read of the current session stats
    pub fn snapshot(&self) -> Option<SessionStats> {
        self.aggregator.lock().unwrap().snapshot()
    }
}

impl Drop for StatsEventAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}
