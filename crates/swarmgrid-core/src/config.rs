//! World construction parameters.

use serde::{Deserialize, Serialize};

/// Configuration for a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World width in cells.
    pub width: i32,
    /// World height in cells.
    pub height: i32,
    /// When true, the edges wrap around.
    pub torus: bool,
    /// When set, the world ends once `time` reaches this many ticks.
    pub max_steps: Option<u64>,
    /// Seed for the world-owned deterministic RNG.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            torus: false,
            max_steps: None,
            seed: 0,
        }
    }
}

impl WorldConfig {
    /// A config with the given dimensions and defaults otherwise.
    #[must_use]
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Enables toroidal wraparound.
    #[must_use]
    pub fn toroidal(mut self) -> Self {
        self.torus = true;
        self
    }

    /// Sets the tick limit.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Sets the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = WorldConfig::with_size(30, 20)
            .toroidal()
            .with_max_steps(500)
            .with_seed(42);
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 20);
        assert!(config.torus);
        assert_eq!(config.max_steps, Some(500));
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = WorldConfig::with_size(8, 8).with_max_steps(10);
        let json = serde_json::to_string(&config).unwrap();
        let back: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
