//! Kart controllers
//!
//! `ArenaAi` carries the navigation state shared by every closed-arena mode.
//! A mode plugs its own decisions in through [`ArenaBehavior`]; the provided
//! [`ArenaBehavior::update`] runs the per-frame loop.

mod arena_ai;
mod soccer_ai;

pub use arena_ai::{ArenaAi, ClosestKart};
pub use soccer_ai::SoccerAi;

use serde::{Deserialize, Serialize};

use crate::error::{AiError, Result};
use crate::world::{ArenaWorld, KartState, NavMesh};

/// Controls handed to the kart physics for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KartControl {
    /// -1 = full left, 1 = full right
    pub steer: f32,
    /// 0..=1 throttle
    pub accel: f32,
    /// Brake, or reverse once stopped
    pub brake: bool,
    pub nitro: bool,
    /// Use the held power-up this frame
    pub fire: bool,
    /// Fire backwards
    pub look_back: bool,
}

impl KartControl {
    /// Standing still: start countdown, eliminated kart
    pub fn idle() -> Self {
        Self { brake: true, ..Self::default() }
    }

    pub fn reverse(steer: f32) -> Self {
        Self { steer: -steer, accel: 0.0, brake: true, ..Self::default() }
    }
}

/// Mode-specific hooks of an arena AI.
pub trait ArenaBehavior<W: ArenaWorld + ?Sized> {
    fn arena(&self) -> &ArenaAi;

    fn arena_mut(&mut self) -> &mut ArenaAi;

    fn is_waiting(&self, world: &W) -> bool;

    fn current_node(&self, world: &W) -> Option<usize>;

    /// Record the opponent to harass (or avoid).
    fn find_closest_kart(&mut self, world: &W, kart: &KartState);

    /// Pick the point the kart should drive to this frame.
    fn find_target(&mut self, world: &W, nav: &dyn NavMesh, kart: &KartState);

    /// One frame of AI. Re-evaluates the whole world state every call.
    fn update(&mut self, world: &W, nav: &dyn NavMesh, dt: f32) -> Result<KartControl> {
        let kart_id = self.arena().kart_id();
        let kart = world
            .kart(kart_id)
            .cloned()
            .ok_or(AiError::InvalidKart { id: kart_id, num_karts: world.num_karts() })?;

        if self.is_waiting(world) || kart.eliminated {
            self.arena_mut().stop();
            return Ok(self.arena().controls());
        }

        self.arena_mut().check_if_stuck(&kart, dt);
        self.find_closest_kart(world, &kart);
        self.find_target(world, nav, &kart);

        let current = self.current_node(world);
        let arena = self.arena_mut();
        arena.drive(&kart, current, nav);
        arena.handle_arena_items(&kart);
        Ok(arena.controls())
    }
}
