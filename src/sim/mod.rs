//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes from the host, clamped per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod core;
pub mod layout;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, hits_player};
pub use self::core::SimulationCore;
pub use layout::FieldLayout;
pub use spawner::{Spawn, Spawner};
pub use state::{Entity, EntityKind, GameEvent, GameState, Phase, Player, RunState, Snapshot};
pub use tick::{Command, LaneMove, TickInput, TickOutcome, tick};
