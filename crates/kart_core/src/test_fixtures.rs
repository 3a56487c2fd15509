//! Test Fixtures Module
//!
//! A straight pitch along Z for controller tests:
//! - 11 nav polys, centers at z = -50, -40, ..., 50 (x = 0)
//! - red defends the goal at node 0 (z = -50), blue the goal at node 10
//!
//! ## Usage
//! ```rust,ignore
//! use crate::test_fixtures::*;
//! ```

use crate::geometry::Pos3;
use crate::items::{ArenaItem, ItemKind};
use crate::snapshot::{BallSnapshot, GoalNodes, NavSnapshot, PitchKart, PitchSnapshot};
use crate::world::{KartState, SoccerTeam};

pub const NUM_NODES: usize = 11;
pub const NODE_SPACING: f32 = 10.0;
pub const RED_GOAL_NODE: usize = 0;
pub const BLUE_GOAL_NODE: usize = NUM_NODES - 1;

pub fn node_center(node: usize) -> Pos3 {
    Pos3::new(0.0, 0.0, -50.0 + NODE_SPACING * node as f32)
}

/// Nearest poly by z; x is ignored.
pub fn node_at(z: f32) -> usize {
    (((z + 50.0) / NODE_SPACING).round().max(0.0) as usize).min(NUM_NODES - 1)
}

pub fn line_nav() -> NavSnapshot {
    let centers = (0..NUM_NODES).map(node_center).collect();
    let next_hop = (0..NUM_NODES)
        .map(|from| {
            (0..NUM_NODES)
                .map(|to| {
                    Some(match from.cmp(&to) {
                        std::cmp::Ordering::Less => from + 1,
                        std::cmp::Ordering::Greater => from - 1,
                        std::cmp::Ordering::Equal => to,
                    })
                })
                .collect()
        })
        .collect();
    NavSnapshot { centers, next_hop }
}

pub fn kart_at(id: usize, x: f32, z: f32, heading: f32) -> KartState {
    KartState::new(id, Pos3::new(x, 0.0, z), heading)
}

pub fn bonus_box(x: f32, z: f32, node: Option<usize>) -> ArenaItem {
    ArenaItem { kind: ItemKind::BonusBox, position: Pos3::new(x, 0.0, z), node, available: true }
}

pub struct PitchBuilder {
    karts: Vec<PitchKart>,
    ball: Pos3,
    items: Vec<ArenaItem>,
}

impl PitchBuilder {
    pub fn new() -> Self {
        Self { karts: Vec::new(), ball: Pos3::origin(), items: Vec::new() }
    }

    /// Karts must be added in id order.
    pub fn kart(mut self, state: KartState, team: SoccerTeam) -> Self {
        let node = Some(node_at(state.position.z));
        self.karts.push(PitchKart { state, team, node });
        self
    }

    pub fn ball(mut self, x: f32, z: f32) -> Self {
        self.ball = Pos3::new(x, 0.0, z);
        self
    }

    pub fn item(mut self, item: ArenaItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn build(self) -> PitchSnapshot {
        PitchSnapshot {
            karts: self.karts,
            ball: BallSnapshot { position: self.ball, node: Some(node_at(self.ball.z)) },
            goals: GoalNodes { red: RED_GOAL_NODE, blue: BLUE_GOAL_NODE },
            items: self.items,
            start_phase: false,
            nav: line_nav(),
        }
    }
}
