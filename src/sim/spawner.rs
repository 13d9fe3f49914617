//! Accumulator-driven entity spawning
//!
//! Two independent countdowns, one per entity kind, are decremented by the
//! simulated time of every tick. All randomness comes from a seeded PCG stream
//! so a run replays exactly from its seed and its elapsed-time sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::layout::FieldLayout;
use super::state::EntityKind;
use crate::config::{GameConfig, IntervalRange};
use crate::consts::OBSTACLE_SPAWN_JITTER;

/// A spawn decided by the spawner, placed by the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub kind: EntityKind,
    pub lane: usize,
    pub position: f32,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    /// Milliseconds until the next obstacle attempt
    obstacle_countdown: f32,
    /// Milliseconds until the next collectible
    collectible_countdown: f32,
}

impl Spawner {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut spawner = Self {
            rng: Pcg32::seed_from_u64(seed),
            obstacle_countdown: 0.0,
            collectible_countdown: 0.0,
        };
        spawner.reset(config);
        spawner
    }

    /// Re-roll both countdowns. The RNG stream carries on, so consecutive runs
    /// differ while staying reproducible from the original seed.
    pub fn reset(&mut self, config: &GameConfig) {
        self.obstacle_countdown = self.sample(config.obstacle_interval);
        self.collectible_countdown = self.sample(config.collectible_interval);
    }

    pub fn obstacle_countdown(&self) -> f32 {
        self.obstacle_countdown
    }

    pub fn collectible_countdown(&self) -> f32 {
        self.collectible_countdown
    }

    /// Advance both countdowns by `elapsed_ms` and push any due spawns.
    ///
    /// An obstacle attempt made while `live_obstacles` is at the cap is
    /// dropped, not deferred; its countdown is re-rolled as usual.
    pub fn advance(
        &mut self,
        config: &GameConfig,
        elapsed_ms: f32,
        live_obstacles: usize,
        out: &mut Vec<Spawn>,
    ) {
        if !config.spawning {
            return;
        }

        self.obstacle_countdown -= elapsed_ms;
        if self.obstacle_countdown <= 0.0 {
            if live_obstacles < config.max_obstacles {
                let lane = self.rng.random_range(0..config.lanes);
                let jitter = self.rng.random_range(0.0..=OBSTACLE_SPAWN_JITTER);
                out.push(Spawn {
                    kind: EntityKind::Obstacle,
                    lane,
                    position: FieldLayout::spawn_position(EntityKind::Obstacle, jitter),
                });
            } else {
                log::debug!("Obstacle cap {} reached, skipping spawn", config.max_obstacles);
            }
            self.obstacle_countdown = self.sample(config.obstacle_interval);
        }

        self.collectible_countdown -= elapsed_ms;
        if self.collectible_countdown <= 0.0 {
            let lane = self.rng.random_range(0..config.lanes);
            out.push(Spawn {
                kind: EntityKind::Collectible,
                lane,
                position: FieldLayout::spawn_position(EntityKind::Collectible, 0.0),
            });
            self.collectible_countdown = self.sample(config.collectible_interval);
        }
    }

    fn sample(&mut self, range: IntervalRange) -> f32 {
        self.rng.random_range(range.min_ms..=range.max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spawner: &mut Spawner, config: &GameConfig, ticks: usize, live: usize) -> Vec<Spawn> {
        let mut out = Vec::new();
        for _ in 0..ticks {
            spawner.advance(config, 16.0, live, &mut out);
        }
        out
    }

    #[test]
    fn test_countdowns_within_configured_range() {
        let config = GameConfig::default();
        let spawner = Spawner::new(&config, 7);
        assert!((800.0..=1200.0).contains(&spawner.obstacle_countdown()));
        assert!((6000.0..=12000.0).contains(&spawner.collectible_countdown()));
    }

    #[test]
    fn test_spawns_in_range_and_offscreen() {
        let config = GameConfig::default();
        let mut spawner = Spawner::new(&config, 42);
        let spawns = run(&mut spawner, &config, 5_000, 0);
        assert!(spawns.iter().any(|s| s.kind == EntityKind::Obstacle));
        assert!(spawns.iter().any(|s| s.kind == EntityKind::Collectible));
        for spawn in &spawns {
            assert!(spawn.lane < config.lanes);
            assert!(spawn.position + spawn.kind.size().y <= 0.0);
        }
    }

    #[test]
    fn test_obstacle_cap_skips_but_collectibles_continue() {
        let config = GameConfig::default();
        let mut spawner = Spawner::new(&config, 3);
        let spawns = run(&mut spawner, &config, 2_000, config.max_obstacles);
        assert!(spawns.iter().all(|s| s.kind == EntityKind::Collectible));
        assert!(!spawns.is_empty());
        // The skipped attempt still re-rolled its countdown
        assert!(spawner.obstacle_countdown() > 0.0);
    }

    #[test]
    fn test_disabled_spawner_is_silent() {
        let config = GameConfig {
            spawning: false,
            ..Default::default()
        };
        let mut spawner = Spawner::new(&config, 3);
        assert!(run(&mut spawner, &config, 10_000, 0).is_empty());
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let config = GameConfig::default();
        let a = run(&mut Spawner::new(&config, 99), &config, 3_000, 0);
        let b = run(&mut Spawner::new(&config, 99), &config, 3_000, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_at_most_one_obstacle_per_tick() {
        let config = GameConfig::default();
        let mut spawner = Spawner::new(&config, 5);
        let mut out = Vec::new();
        spawner.advance(&config, 50_000.0, 0, &mut out);
        let obstacles = out.iter().filter(|s| s.kind == EntityKind::Obstacle).count();
        assert_eq!(obstacles, 1);
    }
}
