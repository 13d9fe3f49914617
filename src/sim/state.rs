//! Game state and core simulation types
//!
//! Everything a single run mutates lives in [`GameState`]; the presentation
//! layer only ever sees the borrowed [`Snapshot`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::FieldLayout;
use super::spawner::Spawner;
use crate::config::GameConfig;
use crate::consts::*;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Assets loaded, waiting for the first start
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Ticks are no-ops until resumed
    Paused,
    /// Crashed; only a restart leaves this phase
    Ended,
}

/// What a falling entity does to the player on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Another car: contact ends the run
    Obstacle,
    /// Coin: contact awards bonus points
    Collectible,
}

impl EntityKind {
    /// Sprite size in pixels
    pub fn size(self) -> Vec2 {
        match self {
            EntityKind::Obstacle => Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            EntityKind::Collectible => Vec2::splat(COLLECTIBLE_SIZE),
        }
    }

    /// Speed relative to the current obstacle speed
    pub fn speed_scale(self, config: &GameConfig) -> f32 {
        match self {
            EntityKind::Obstacle => 1.0,
            EntityKind::Collectible => config.collectible_speed_scale,
        }
    }
}

/// An obstacle or collectible travelling down a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: usize,
    /// Top edge, pixels from the top of the field (negative = above it)
    pub position: f32,
    /// Pixels per second, refreshed every tick from the difficulty
    pub vertical_speed: f32,
    /// Collected this tick, dropped at the end of the collision pass
    #[serde(skip)]
    pub consumed: bool,
}

impl Entity {
    pub fn height(&self) -> f32 {
        self.kind.size().y
    }

    /// Vertical extent as (top, bottom)
    pub fn span(&self) -> (f32, f32) {
        (self.position, self.position + self.height())
    }
}

/// The player's car; its vertical position is fixed by the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub lane: usize,
}

impl Player {
    /// Lane the car starts each run in
    pub fn start_lane(lanes: usize) -> usize {
        lanes.saturating_sub(1) / 2
    }

    /// Shift one lane left, ignoring moves past the edge
    pub fn move_left(&mut self) -> bool {
        if self.lane > 0 {
            self.lane -= 1;
            true
        } else {
            false
        }
    }

    /// Shift one lane right, ignoring moves past the edge
    pub fn move_right(&mut self, lanes: usize) -> bool {
        if self.lane + 1 < lanes {
            self.lane += 1;
            true
        } else {
            false
        }
    }
}

/// Per-run counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    /// Simulated survival time (ms)
    pub elapsed_ms: f64,
    /// Fractional passive points not yet awarded
    pub score_buffer: f64,
    /// Derived from score, see [`GameConfig::difficulty_for`]
    pub difficulty: f32,
}

/// Things that happened during a tick, for sound and UI feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Spawned { id: u32, kind: EntityKind, lane: usize },
    LaneChanged { lane: usize },
    Collected { id: u32, bonus: u64 },
    Crashed { id: u32 },
    Paused,
    Resumed,
    RunEnded { score: u64, new_high_score: bool },
}

/// Complete mutable state of the simulation
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    pub player: Player,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    pub run: RunState,
    pub spawner: Spawner,
    pub layout: FieldLayout,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle state; `seed` drives every random draw
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            phase: Phase::NotStarted,
            player: Player {
                lane: Player::start_lane(config.lanes),
            },
            entities: Vec::new(),
            run: RunState::default(),
            spawner: Spawner::new(config, seed),
            layout: FieldLayout::new(config),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear everything belonging to the previous run
    pub fn reset_run(&mut self, config: &GameConfig) {
        self.entities.clear();
        self.run = RunState::default();
        self.player.lane = Player::start_lane(config.lanes);
        self.spawner.reset(config);
    }

    /// Append an entity at the current difficulty speed
    pub fn push_entity(
        &mut self,
        config: &GameConfig,
        kind: EntityKind,
        lane: usize,
        position: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        let vertical_speed =
            config.obstacle_speed(self.run.difficulty) * kind.speed_scale(config);
        self.entities.push(Entity {
            id,
            kind,
            lane,
            position,
            vertical_speed,
            consumed: false,
        });
        id
    }

    pub fn live_obstacles(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::Obstacle)
            .count()
    }
}

/// Read-only view handed to the presentation layer each frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub player_lane: usize,
    pub entities: &'a [Entity],
    pub score: u64,
    pub high_score: u64,
    pub phase: Phase,
    pub difficulty: f32,
}
