//! Power-up usage parameters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    pub use_items: bool,
    /// Swatter and bubblegum fire when an opponent is this close (default: 10.0)
    pub close_distance: f32,
    /// Max range for forward projectiles (default: 25.0)
    pub fire_distance: f32,
    /// Max heading error (rad) toward the victim for projectiles (default: 0.3)
    pub fire_angle: f32,
    /// Zipper only fires toward a target at least this far away (default: 6.0)
    pub zipper_min_distance: f32,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            use_items: true,
            close_distance: 10.0,
            fire_distance: 25.0,
            fire_angle: 0.3,
            zipper_min_distance: 6.0,
        }
    }
}
