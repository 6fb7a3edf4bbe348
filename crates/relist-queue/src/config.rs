//! Configuration for the notify queue.

/// Configuration for queue behavior.
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
    /// Whether the default diff engine reports reordered elements as moves.
    pub detect_moves: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            event_capacity: 100,
            detect_moves: true,
        }
    }
}

/// Builder for queue configuration.
pub struct QueueConfigBuilder {
    config: QueueConfig,
}

impl QueueConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: QueueConfig::default(),
        }
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn detect_moves(mut self, enabled: bool) -> Self {
        self.config.detect_moves = enabled;
        self
    }

    pub fn build(self) -> QueueConfig {
        self.config
    }
}

impl Default for QueueConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
