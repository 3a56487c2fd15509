//! World queries consumed by the AI controllers
//!
//! The host engine owns physics, the arena and its nav mesh; the controllers
//! only read from it through these traits once per frame.

use serde::{Deserialize, Serialize};

use crate::geometry::{kart_transform, KartTransform, Pos3};
use crate::items::{ArenaItem, AttachmentType, PowerupType};

/// Per-frame view of one kart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KartState {
    pub id: usize,
    pub position: Pos3,
    /// Yaw in radians about +Y, 0 faces +Z
    #[serde(default)]
    pub heading: f32,
    /// Forward speed in m/s, negative while reversing
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub eliminated: bool,
    #[serde(default)]
    pub powerup: PowerupType,
    #[serde(default)]
    pub attachment: AttachmentType,
}

impl KartState {
    pub fn new(id: usize, position: Pos3, heading: f32) -> Self {
        Self {
            id,
            position,
            heading,
            speed: 0.0,
            eliminated: false,
            powerup: PowerupType::Nothing,
            attachment: AttachmentType::Nothing,
        }
    }

    pub fn transform(&self) -> KartTransform {
        kart_transform(self.position, self.heading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoccerTeam {
    Red,
    Blue,
}

impl SoccerTeam {
    pub fn opponent(self) -> Self {
        match self {
            SoccerTeam::Red => SoccerTeam::Blue,
            SoccerTeam::Blue => SoccerTeam::Red,
        }
    }
}

/// Queries shared by every closed-arena mode.
pub trait ArenaWorld {
    fn num_karts(&self) -> usize;

    fn kart(&self, id: usize) -> Option<&KartState>;

    /// Nav poly the kart is on, `None` when off the mesh
    fn kart_node(&self, id: usize) -> Option<usize>;

    fn items(&self) -> &[ArenaItem];

    /// Countdown before the match starts
    fn is_start_phase(&self) -> bool;
}

pub trait SoccerWorld: ArenaWorld {
    fn kart_team(&self, id: usize) -> SoccerTeam;

    fn ball_position(&self) -> Pos3;

    fn ball_node(&self) -> Option<usize>;

    /// Nav poly of the goal defended by `team`
    fn goal_node(&self, team: SoccerTeam) -> usize;
}

/// Precomputed nav mesh owned by the arena.
pub trait NavMesh {
    fn poly_center(&self, node: usize) -> Option<Pos3>;

    /// First hop of the shortest path `from → to`, `None` if unreachable
    fn next_node(&self, from: usize, to: usize) -> Option<usize>;
}
