//! Arena steering and recovery parameters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringConfig {
    // === Steering ===
    /// Heading error (rad) that maps to full steering lock (default: 0.6)
    pub max_steer_angle: f32,
    /// Heading error (rad) above which the kart eases off (default: 1.0)
    pub sharp_turn_angle: f32,
    /// Throttle while turning sharply (default: 0.5)
    pub turn_accel: f32,
    /// Throttle cap on straights (default: 1.0)
    pub max_accel: f32,

    // === U-turn ===
    /// Aim points behind the kart and closer than this are reached in reverse (default: 8.0)
    pub uturn_distance: f32,

    // === Stuck recovery ===
    pub detect_stuck: bool,
    /// Speed (m/s) under which the kart counts as stuck (default: 0.5)
    pub stuck_speed: f32,
    /// Seconds below `stuck_speed` before reversing (default: 2.0)
    pub stuck_time: f32,
    /// Seconds spent reversing once stuck (default: 1.0)
    pub reverse_time: f32,

    // === Nitro ===
    pub use_nitro: bool,
    /// Max heading error (rad) for nitro (default: 0.2)
    pub nitro_angle: f32,
    /// Min speed (m/s) for nitro (default: 15.0)
    pub nitro_min_speed: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            max_steer_angle: 0.6,
            sharp_turn_angle: 1.0,
            turn_accel: 0.5,
            max_accel: 1.0,

            uturn_distance: 8.0,

            detect_stuck: true,
            stuck_speed: 0.5,
            stuck_time: 2.0,
            reverse_time: 1.0,

            use_nitro: true,
            nitro_angle: 0.2,
            nitro_min_speed: 15.0,
        }
    }
}
