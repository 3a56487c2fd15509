//! # kart_core - Arena AI for kart soccer
//!
//! Reactive controllers for non-player karts in closed arenas.
//!
//! ## Features
//! - Per-frame re-evaluation of the world, no planning or search
//! - Ball approach heuristic that lines shots up with the opposing goal
//! - Power-up collection and usage, nav-mesh guided steering, stuck recovery
//! - Serialisable world snapshots for engine bridges

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod items;
pub mod snapshot;
pub mod world;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use config::AiConfig;
pub use controller::{ArenaAi, ArenaBehavior, ClosestKart, KartControl, SoccerAi};
pub use error::{AiError, Result};
pub use geometry::{check_position, PosData};
pub use items::{ArenaItem, AttachmentType, ItemKind, PowerupType};
pub use snapshot::PitchSnapshot;
pub use world::{ArenaWorld, KartState, NavMesh, SoccerTeam, SoccerWorld};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
