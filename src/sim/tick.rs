//! Per-frame simulation step
//!
//! Advances one run by an elapsed-time delta: lane changes, spawning,
//! movement, culling, collisions, then passive scoring.

use super::collision::hits_player;
use super::spawner::Spawn;
use super::state::{EntityKind, GameEvent, GameState, Phase};
use crate::config::GameConfig;

/// Discrete player commands, from keyboard or on-screen controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    TogglePause,
    Restart,
}

/// A queued lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneMove {
    Left,
    Right,
}

/// Input gathered between two ticks, applied atomically at the start of the next
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub lane_moves: Vec<LaneMove>,
}

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing was simulated
    Idle,
    Advanced,
    /// An obstacle hit the player this tick
    Crashed,
}

/// Advance the run by `elapsed_ms` (clamped to `config.max_tick_ms`)
pub fn tick(
    state: &mut GameState,
    config: &GameConfig,
    input: &TickInput,
    elapsed_ms: f32,
) -> TickOutcome {
    if state.phase != Phase::Running {
        return TickOutcome::Idle;
    }

    let dt_ms = if elapsed_ms.is_finite() {
        elapsed_ms.clamp(0.0, config.max_tick_ms)
    } else {
        0.0
    };

    // 1. Lane changes
    for lane_move in &input.lane_moves {
        let moved = match lane_move {
            LaneMove::Left => state.player.move_left(),
            LaneMove::Right => state.player.move_right(config.lanes),
        };
        if moved {
            state.events.push(GameEvent::LaneChanged {
                lane: state.player.lane,
            });
        }
    }

    // 2. Spawning
    let mut spawns: Vec<Spawn> = Vec::new();
    let live_obstacles = state.live_obstacles();
    state
        .spawner
        .advance(config, dt_ms, live_obstacles, &mut spawns);
    for spawn in spawns {
        let id = state.push_entity(config, spawn.kind, spawn.lane, spawn.position);
        log::debug!("Spawned {:?} #{} in lane {}", spawn.kind, id, spawn.lane);
        state.events.push(GameEvent::Spawned {
            id,
            kind: spawn.kind,
            lane: spawn.lane,
        });
    }

    // 3. Movement at the current difficulty
    let speed = config.obstacle_speed(state.run.difficulty);
    let dt_secs = dt_ms / 1000.0;
    for entity in &mut state.entities {
        entity.vertical_speed = speed * entity.kind.speed_scale(config);
        entity.position += entity.vertical_speed * dt_secs;
    }

    // 4. Cull entities well past the bottom edge
    let far_bound = state.layout.height + config.removal_margin;
    state.entities.retain(|e| e.position <= far_bound);

    // 5. Collisions, in store order
    let mut crashed_into = None;
    for entity in &mut state.entities {
        if !hits_player(&state.layout, state.player.lane, entity) {
            continue;
        }
        match entity.kind {
            EntityKind::Obstacle => {
                crashed_into = Some(entity.id);
                break;
            }
            EntityKind::Collectible => {
                entity.consumed = true;
                state.run.score += config.collectible_bonus;
                log::debug!("Collected #{} (+{})", entity.id, config.collectible_bonus);
                state.events.push(GameEvent::Collected {
                    id: entity.id,
                    bonus: config.collectible_bonus,
                });
            }
        }
    }
    state.entities.retain(|e| !e.consumed);

    if let Some(id) = crashed_into {
        state.phase = Phase::Ended;
        state.run.difficulty = config.difficulty_for(state.run.score);
        state.events.push(GameEvent::Crashed { id });
        return TickOutcome::Crashed;
    }

    // 6. Passive scoring with fractional carry
    state.run.elapsed_ms += f64::from(dt_ms);
    state.run.score_buffer += f64::from(dt_ms) * config.score_per_second / 1000.0;
    let whole = state.run.score_buffer.floor();
    if whole >= 1.0 {
        state.run.score += whole as u64;
        state.run.score_buffer -= whole;
    }
    state.run.difficulty = config.difficulty_for(state.run.score);

    TickOutcome::Advanced
}
