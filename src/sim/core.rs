//! Simulation instance owned by the host
//!
//! Wraps one [`GameState`] with its configuration, the queued input, the
//! best score and the store that persists it. The host calls [`SimulationCore::tick`]
//! once per animation frame and reads [`SimulationCore::snapshot`] to draw.

use super::state::{Entity, EntityKind, GameEvent, GameState, Phase, Snapshot};
use super::tick::{Command, LaneMove, TickInput, TickOutcome, tick};
use crate::config::{ConfigError, GameConfig};
use crate::highscores::HighScore;
use crate::persistence::HighScoreStore;

pub struct SimulationCore<S: HighScoreStore> {
    config: GameConfig,
    state: GameState,
    /// Lane changes received since the last tick
    pending: TickInput,
    high_score: HighScore,
    store: S,
}

impl<S: HighScoreStore> SimulationCore<S> {
    /// Build a core and read the persisted best score once.
    pub fn new(config: GameConfig, store: S, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let high_score = HighScore::load(&store);
        let state = GameState::new(&config, seed);
        log::info!("Simulation ready ({} lanes, seed {})", config.lanes, seed);
        Ok(Self {
            config,
            state,
            pending: TickInput::default(),
            high_score,
            store,
        })
    }

    // === Lifecycle ===

    /// Begin a fresh run. Only valid before the first run or after a crash.
    pub fn start(&mut self) {
        if !matches!(self.state.phase, Phase::NotStarted | Phase::Ended) {
            return;
        }
        self.state.reset_run(&self.config);
        self.pending.lane_moves.clear();
        self.state.phase = Phase::Running;
        self.state.events.push(GameEvent::Started);
        log::info!("Run started");
    }

    pub fn pause(&mut self) {
        if self.state.phase == Phase::Running {
            self.state.phase = Phase::Paused;
            self.state.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == Phase::Paused {
            self.state.phase = Phase::Running;
            self.state.events.push(GameEvent::Resumed);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Absolute pause request (visibility changes); the latest call wins
    pub fn set_paused(&mut self, paused: bool) {
        if paused {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Finish the current run. No effect once ended or before starting.
    pub fn end(&mut self) {
        if !matches!(self.state.phase, Phase::Running | Phase::Paused) {
            return;
        }
        self.state.phase = Phase::Ended;
        self.finish_run();
    }

    fn finish_run(&mut self) {
        let score = self.state.run.score;
        let new_high_score = self.high_score.record(score, &mut self.store);
        log::info!(
            "Run ended: score {} after {:.1}s (best {})",
            score,
            self.state.run.elapsed_ms / 1000.0,
            self.high_score.best
        );
        self.state.events.push(GameEvent::RunEnded {
            score,
            new_high_score,
        });
        self.pending.lane_moves.clear();
    }

    // === Input ===

    /// Handle a player command. Lane changes wait for the next tick; pause and
    /// restart take effect immediately.
    pub fn push_command(&mut self, command: Command) {
        match command {
            Command::MoveLeft | Command::MoveRight => {
                if self.state.phase != Phase::Running {
                    return;
                }
                let lane_move = if command == Command::MoveLeft {
                    LaneMove::Left
                } else {
                    LaneMove::Right
                };
                self.pending.lane_moves.push(lane_move);
            }
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.start(),
        }
    }

    // === Simulation ===

    /// Advance by the host's frame delta. A no-op unless running.
    pub fn tick(&mut self, elapsed_ms: f32) {
        if self.state.phase != Phase::Running {
            return;
        }
        let input = std::mem::take(&mut self.pending);
        if tick(&mut self.state, &self.config, &input, elapsed_ms) == TickOutcome::Crashed {
            self.finish_run();
        }
    }

    /// Place an entity directly, bypassing the spawner. Returns `None` for an
    /// out-of-range lane.
    pub fn spawn_entity(&mut self, kind: EntityKind, lane: usize, position: f32) -> Option<u32> {
        if lane >= self.config.lanes {
            return None;
        }
        Some(self.state.push_entity(&self.config, kind, lane, position))
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    // === Queries ===

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player_lane: self.state.player.lane,
            entities: &self.state.entities,
            score: self.state.run.score,
            high_score: self.high_score.best,
            phase: self.state.phase,
            difficulty: self.state.run.difficulty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.run.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn player_lane(&self) -> usize {
        self.state.player.lane
    }

    pub fn entities(&self) -> &[Entity] {
        &self.state.entities
    }

    /// Current obstacle speed (pixels/s), e.g. for scrolling the road
    pub fn obstacle_speed(&self) -> f32 {
        self.config.obstacle_speed(self.state.run.difficulty)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn quiet_config() -> GameConfig {
        GameConfig {
            spawning: false,
            ..Default::default()
        }
    }

    fn core_with(config: GameConfig, best: u64) -> SimulationCore<MemoryStore> {
        SimulationCore::new(config, MemoryStore::with_score(best), 2024).unwrap()
    }

    fn running(config: GameConfig) -> SimulationCore<MemoryStore> {
        let mut core = core_with(config, 0);
        core.start();
        core
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig {
            lanes: 0,
            ..Default::default()
        };
        assert!(SimulationCore::new(config, MemoryStore::new(), 1).is_err());
    }

    #[test]
    fn test_passive_scoring_has_no_fractional_leak() {
        // Stationary field so a long single tick is allowed
        let config = GameConfig {
            spawning: false,
            base_speed: 0.0,
            max_tick_ms: 10_000.0,
            ..Default::default()
        };

        let mut many = running(config.clone());
        for _ in 0..100 {
            many.tick(100.0);
        }
        let mut once = running(config.clone());
        once.tick(10_000.0);

        assert_eq!(many.score(), 100);
        assert_eq!(once.score(), 100);

        // Frame-sized deltas that do not divide evenly still add up
        let mut uneven = running(config);
        for _ in 0..600 {
            uneven.tick(1000.0 / 60.0);
        }
        assert!((99..=100).contains(&uneven.score()));
    }

    #[test]
    fn test_obstacle_crash_ends_run_on_that_tick() {
        let mut core = running(quiet_config());
        let lane = core.player_lane();
        let top = core.state().layout.player_top;
        core.spawn_entity(EntityKind::Obstacle, lane, top - 10.0).unwrap();

        core.tick(16.0);
        assert_eq!(core.phase(), Phase::Ended);
        let score = core.score();
        let frozen: Vec<f32> = core.entities().iter().map(|e| e.position).collect();

        for _ in 0..50 {
            core.tick(16.0);
        }
        assert_eq!(core.score(), score);
        let after: Vec<f32> = core.entities().iter().map(|e| e.position).collect();
        assert_eq!(frozen, after);
        assert!(core.drain_events().iter().any(|e| matches!(e, GameEvent::Crashed { .. })));
    }

    #[test]
    fn test_obstacle_in_other_lane_is_harmless() {
        let mut core = running(quiet_config());
        let other = (core.player_lane() + 1) % core.config().lanes;
        let top = core.state().layout.player_top;
        core.spawn_entity(EntityKind::Obstacle, other, top).unwrap();
        core.tick(16.0);
        assert_eq!(core.phase(), Phase::Running);
    }

    #[test]
    fn test_collectible_counted_once() {
        let mut core = running(quiet_config());
        let lane = core.player_lane();
        let top = core.state().layout.player_top;
        let id = core.spawn_entity(EntityKind::Collectible, lane, top + 20.0).unwrap();

        core.tick(10.0);
        assert_eq!(core.score(), 25);
        assert!(core.entities().iter().all(|e| e.id != id));

        // Still inside the hit zone had it survived; nothing more is added
        core.tick(10.0);
        core.tick(10.0);
        assert_eq!(core.score(), 25);
        let collected = core
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Collected { .. }))
            .count();
        assert_eq!(collected, 1);
    }

    #[test]
    fn test_high_score_updated_when_beaten() {
        let mut core = core_with(quiet_config(), 200);
        assert_eq!(core.high_score(), 200);
        core.start();
        core.state.run.score = 350;
        core.end();
        assert_eq!(core.high_score(), 350);
        assert_eq!(core.store().value(), Some(350));
        assert!(core.drain_events().contains(&GameEvent::RunEnded {
            score: 350,
            new_high_score: true
        }));
    }

    #[test]
    fn test_high_score_kept_when_not_beaten() {
        let mut core = core_with(quiet_config(), 200);
        core.start();
        core.state.run.score = 150;
        core.end();
        assert_eq!(core.high_score(), 200);
        assert_eq!(core.store().value(), Some(200));
        assert_eq!(core.store().writes(), 0);
    }

    #[test]
    fn test_crash_persists_high_score() {
        let mut core = core_with(quiet_config(), 0);
        core.start();
        core.tick(50.0);
        core.tick(50.0);
        let lane = core.player_lane();
        let top = core.state().layout.player_top;
        core.spawn_entity(EntityKind::Obstacle, lane, top).unwrap();
        core.tick(16.0);
        assert_eq!(core.phase(), Phase::Ended);
        assert_eq!(core.store().value(), Some(1));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut core = running(GameConfig::default());
        for _ in 0..200 {
            core.tick(50.0);
        }
        core.end();
        assert_eq!(core.phase(), Phase::Ended);
        assert!(core.score() > 0);

        core.push_command(Command::Restart);
        assert_eq!(core.phase(), Phase::Running);
        assert_eq!(core.score(), 0);
        assert!(core.entities().is_empty());
        assert_eq!(core.player_lane(), 1);
    }

    #[test]
    fn test_restart_ignored_mid_run() {
        let mut core = running(quiet_config());
        for _ in 0..50 {
            core.tick(50.0);
        }
        assert_eq!(core.score(), 25);
        core.push_command(Command::Restart);
        assert_eq!(core.score(), 25);
        assert_eq!(core.phase(), Phase::Running);
    }

    #[test]
    fn test_pause_idempotent_and_freezes() {
        let mut core = running(quiet_config());
        core.pause();
        core.pause();
        assert_eq!(core.phase(), Phase::Paused);

        for _ in 0..100 {
            core.tick(50.0);
        }
        assert_eq!(core.score(), 0);

        core.resume();
        assert_eq!(core.phase(), Phase::Running);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut core = core_with(quiet_config(), 0);
        core.pause();
        core.resume();
        core.end();
        assert_eq!(core.phase(), Phase::NotStarted);

        core.start();
        core.end();
        core.end();
        core.pause();
        core.set_paused(false);
        assert_eq!(core.phase(), Phase::Ended);
        let ended = core
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_visibility_last_writer_wins() {
        let mut core = running(quiet_config());
        core.set_paused(true);
        core.set_paused(false);
        core.set_paused(true);
        assert_eq!(core.phase(), Phase::Paused);
        core.set_paused(false);
        assert_eq!(core.phase(), Phase::Running);
    }

    #[test]
    fn test_lane_commands_wait_for_tick() {
        let mut core = running(quiet_config());
        core.push_command(Command::MoveLeft);
        assert_eq!(core.player_lane(), 1);
        core.tick(16.0);
        assert_eq!(core.player_lane(), 0);

        for _ in 0..10 {
            core.push_command(Command::MoveLeft);
        }
        core.tick(16.0);
        assert_eq!(core.player_lane(), 0);
    }

    #[test]
    fn test_lane_commands_dropped_while_paused() {
        let mut core = running(quiet_config());
        core.push_command(Command::TogglePause);
        core.push_command(Command::MoveRight);
        core.push_command(Command::TogglePause);
        core.tick(16.0);
        assert_eq!(core.player_lane(), 1);
    }

    #[test]
    fn test_spawn_entity_rejects_bad_lane() {
        let mut core = running(quiet_config());
        assert!(core.spawn_entity(EntityKind::Obstacle, 4, 0.0).is_none());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut core = core_with(quiet_config(), 77);
        core.start();
        core.spawn_entity(EntityKind::Collectible, 0, -50.0).unwrap();
        let snap = core.snapshot();
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.high_score, 77);
        assert_eq!(snap.player_lane, 1);
        assert_eq!(snap.entities.len(), 1);
        assert_eq!(snap.entities[0].kind, EntityKind::Collectible);
    }
}
