//! Ball approach parameters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoccerConfig {
    /// Beyond this distance an empty-handed kart goes for items (default: 10.0)
    pub ball_chase_distance: f32,
    /// Ball closer than this is in shooting range (default: 3.0)
    pub ball_close_distance: f32,
    /// Goal angle (rad) considered lined up for a shot (default: 0.5)
    pub goal_aim_angle: f32,
    /// Local offset applied when the opposing goal is behind (default: 2.0)
    pub wrong_way_offset: f32,
    /// Local offset applied to line up a shot (default: 1.0)
    pub line_up_offset: f32,
}

impl Default for SoccerConfig {
    fn default() -> Self {
        Self {
            ball_chase_distance: 10.0,
            ball_close_distance: 3.0,
            goal_aim_angle: 0.5,
            wrong_way_offset: 2.0,
            line_up_offset: 1.0,
        }
    }
}
