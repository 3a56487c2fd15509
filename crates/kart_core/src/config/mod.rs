//! # AI Configuration
//!
//! Every tuning constant of the arena and soccer controllers lives here so
//! difficulty levels are data, not code.
//!
//! ## Usage
//! ```rust
//! use kart_core::config::AiConfig;
//!
//! let config = AiConfig::default();
//! let hard = AiConfig::hard();
//! assert!(hard.items.fire_distance > config.items.fire_distance);
//! ```

mod item_config;
mod soccer_config;
mod steering_config;

pub use item_config::ItemConfig;
pub use soccer_config::SoccerConfig;
pub use steering_config::SteeringConfig;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AiConfig {
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub soccer: SoccerConfig,
    #[serde(default)]
    pub items: ItemConfig,
}

impl AiConfig {
    /// Slower, never fires items or nitro
    pub fn easy() -> Self {
        let mut cfg = Self::default();
        cfg.steering.max_accel = 0.8;
        cfg.steering.use_nitro = false;
        cfg.items.use_items = false;
        cfg
    }

    pub fn medium() -> Self {
        Self::default()
    }

    /// Wider firing cone and range
    pub fn hard() -> Self {
        let mut cfg = Self::default();
        cfg.items.fire_distance = 35.0;
        cfg.items.fire_angle = 0.4;
        cfg.steering.nitro_angle = 0.3;
        cfg.steering.nitro_min_speed = 10.0;
        cfg
    }

    /// For tests: no stuck recovery, so short frame sequences stay predictable
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.steering.detect_stuck = false;
        cfg
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Preset by name, as used by the engine bridge.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Self::easy()),
            "medium" => Some(Self::medium()),
            "hard" => Some(Self::hard()),
            "deterministic" => Some(Self::deterministic()),
            _ => None,
        }
    }
}
