//! Lane Dodger - A four-lane car dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, scoring)
//! - `assets`: Fan-in tracking for named sprite loading
//! - `platform`: Browser/native platform abstraction (input, frame clock)
//! - `persistence`: High score storage
//! - `config`: Data-driven game balance
//! - `audio`: Procedural sound effects (Web Audio on wasm)

pub mod assets;
pub mod audio;
pub mod config;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::HighScore;
pub use settings::Settings;
pub use sim::{Command, Phase, SimulationCore, Snapshot};

/// Sprite geometry constants (pixels)
pub mod consts {
    /// Player car sprite
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 128.0;
    /// Gap between the bottom of the player sprite and the field edge
    pub const PLAYER_BOTTOM_GAP: f32 = 34.0;

    /// Obstacle car sprite
    pub const OBSTACLE_WIDTH: f32 = 64.0;
    pub const OBSTACLE_HEIGHT: f32 = 128.0;
    /// Extra random headroom above the field for obstacle spawns
    pub const OBSTACLE_SPAWN_JITTER: f32 = 120.0;

    /// Coin sprite (square)
    pub const COLLECTIBLE_SIZE: f32 = 36.0;
    /// Extra headroom above the field for coin spawns
    pub const COLLECTIBLE_SPAWN_GAP: f32 = 10.0;

    /// Road shoulder on each side of the lanes
    pub const LANE_MARGIN: f32 = 32.0;
}
