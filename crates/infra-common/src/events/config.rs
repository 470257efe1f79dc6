//! Configuration for the in-process event bus.

use serde::{Deserialize, Serialize};

/// Configuration for an [`EventBus`](crate::events::bus::EventBus)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBusConfig {
    /// Capacity of the underlying broadcast channel. Slow subscribers that
    /// fall more than this many events behind start losing the oldest ones.
    pub broadcast_capacity: usize,

    /// Name of the service this bus belongs to (used in logs)
    pub service_name: String,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 1_024,
            service_name: "streamlens".to_string(),
        }
    }
}

impl EventBusConfig {
    /// Create a configuration with the given service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the broadcast channel capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EventBusConfig::default();
        assert_eq!(config.broadcast_capacity, 1_024);
        assert_eq!(config.service_name, "streamlens");
    }

    #[test]
    fn test_builder() {
        let config = EventBusConfig::new("player").with_capacity(64);
        assert_eq!(config.broadcast_capacity, 64);
        assert_eq!(config.service_name, "player");
    }
}
