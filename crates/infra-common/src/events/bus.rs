//! Typed broadcast event bus.
//!
//! This module provides the in-process publish/subscribe mechanism used to
//! distribute pipeline lifecycle events. Every subscriber receives its own
//! clone of each event published after it subscribed; a bus with no
//! subscribers silently drops events.

use std::fmt;

use tokio::sync::broadcast;
use tracing::debug;

use crate::events::config::EventBusConfig;

/// Marker trait for types that can travel on an [`EventBus`].
pub trait Event: Clone + Send + Sync + fmt::Debug + 'static {}

/// In-process broadcast bus for events of type `E`.
///
/// Cloning the bus is cheap; all clones share the same channel.
#[derive(Clone)]
pub struct EventBus<E: Event> {
    sender: broadcast::Sender<E>,
    config: EventBusConfig,
}

impl<E: Event> EventBus<E> {
    /// Create a new event bus with the specified configuration
    pub fn new(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.broadcast_capacity);
        debug!(
            service = %config.service_name,
            capacity = config.broadcast_capacity,
            "created event bus for {}",
            std::any::type_name::<E>()
        );
        Self { sender, config }
    }

    /// Create a new event bus with default configuration
    pub fn new_default() -> Self {
        Self::new(EventBusConfig::default())
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers the event was delivered to. A bus
    /// with no subscribers is not an error condition.
    pub fn publish(&self, event: E) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            // send only fails when there are no receivers
            Err(_) => 0,
        }
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        debug!(
            service = %self.config.service_name,
            "new subscriber for {}",
            std::any::type_name::<E>()
        );
        self.sender.subscribe()
    }

    /// Number of currently attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The configuration this bus was created with
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new_default()
    }
}
