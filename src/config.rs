//! Game balance configuration
//!
//! Every gameplay tunable lives in [`GameConfig`]. Defaults match the shipped
//! game; a JSON override may set any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::PLAYER_HEIGHT;

/// Errors produced when loading or validating a [`GameConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Game needs at least one lane")]
    NoLanes,
    #[error("Invalid {name} interval: min {min}ms, max {max}ms")]
    InvalidInterval {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{0} must be finite and non-negative")]
    InvalidValue(&'static str),
    #[error(
        "Max per-tick displacement {displacement}px reaches the player hit zone ({hit_zone}px); \
         lower max_tick_ms, base_speed or max_difficulty"
    )]
    TunnelingRisk { displacement: f32, hit_zone: f32 },
}

/// Uniform sampling range for a spawn countdown, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalRange {
    pub min_ms: f32,
    pub max_ms: f32,
}

impl IntervalRange {
    pub const fn new(min_ms: f32, max_ms: f32) -> Self {
        Self { min_ms, max_ms }
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        let valid = self.min_ms.is_finite()
            && self.max_ms.is_finite()
            && self.min_ms > 0.0
            && self.min_ms <= self.max_ms;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidInterval {
                name,
                min: self.min_ms,
                max: self.max_ms,
            })
        }
    }
}

/// Gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of lanes
    pub lanes: usize,
    /// Play field size (pixels)
    pub field_width: f32,
    pub field_height: f32,

    // === Spawning ===
    /// Spawner on/off (off is useful for scripted runs)
    pub spawning: bool,
    pub obstacle_interval: IntervalRange,
    pub collectible_interval: IntervalRange,
    /// Live obstacle cap; collectibles are not capped
    pub max_obstacles: usize,

    // === Speed ===
    /// Obstacle speed at difficulty 0 (pixels/s)
    pub base_speed: f32,
    /// Collectibles fall slightly slower than obstacles
    pub collectible_speed_scale: f32,
    /// Difficulty gained per 100 points of score
    pub speed_increase_per_100: f32,
    /// Difficulty ceiling
    pub max_difficulty: f32,

    // === Scoring ===
    pub collectible_bonus: u64,
    /// Passive points per second survived
    pub score_per_second: f64,

    // === Timing ===
    /// Largest elapsed time a single tick will simulate
    pub max_tick_ms: f32,
    /// Distance past the bottom edge before an entity is dropped
    pub removal_margin: f32,

    /// LocalStorage key for the best score
    pub storage_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lanes: 4,
            field_width: 480.0,
            field_height: 800.0,

            spawning: true,
            obstacle_interval: IntervalRange::new(800.0, 1200.0),
            collectible_interval: IntervalRange::new(6000.0, 12000.0),
            max_obstacles: 12,

            base_speed: 180.0,
            collectible_speed_scale: 0.85,
            speed_increase_per_100: 0.08,
            max_difficulty: 4.0,

            collectible_bonus: 25,
            score_per_second: 10.0,

            max_tick_ms: 60.0,
            removal_margin: 200.0,

            storage_key: "carDodger_highscore_v1".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Difficulty factor for a score: monotonic non-decreasing, capped
    pub fn difficulty_for(&self, score: u64) -> f32 {
        let raw = (score as f32 / 100.0) * self.speed_increase_per_100;
        raw.clamp(0.0, self.max_difficulty)
    }

    /// Obstacle speed at a given difficulty (pixels/s)
    pub fn obstacle_speed(&self, difficulty: f32) -> f32 {
        self.base_speed * (1.0 + difficulty)
    }

    /// Fastest any entity can ever move, in pixels per tick
    pub fn max_tick_displacement(&self) -> f32 {
        let fastest_scale = self.collectible_speed_scale.max(1.0);
        self.obstacle_speed(self.max_difficulty) * fastest_scale * self.max_tick_ms / 1000.0
    }

    /// Reject configurations the simulation cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        self.obstacle_interval.check("obstacle")?;
        self.collectible_interval.check("collectible")?;

        let non_negative = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("base_speed", self.base_speed),
            ("collectible_speed_scale", self.collectible_speed_scale),
            ("speed_increase_per_100", self.speed_increase_per_100),
            ("max_difficulty", self.max_difficulty),
            ("max_tick_ms", self.max_tick_ms),
            ("removal_margin", self.removal_margin),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue(name));
            }
        }
        if !self.score_per_second.is_finite() || self.score_per_second < 0.0 {
            return Err(ConfigError::InvalidValue("score_per_second"));
        }

        // Entities must not be able to jump over the player between two ticks
        let displacement = self.max_tick_displacement();
        if displacement >= PLAYER_HEIGHT {
            return Err(ConfigError::TunnelingRisk {
                displacement,
                hit_zone: PLAYER_HEIGHT,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let config = GameConfig::from_json(r#"{ "lanes": 3, "collectible_bonus": 50 }"#).unwrap();
        assert_eq!(config.lanes, 3);
        assert_eq!(config.collectible_bonus, 50);
        assert_eq!(config.max_obstacles, 12);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = GameConfig::from_json("{ lanes: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_inverted_interval() {
        let config = GameConfig {
            obstacle_interval: IntervalRange::new(1200.0, 800.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval { name: "obstacle", .. })
        ));
    }

    #[test]
    fn test_rejects_tunneling_speeds() {
        let config = GameConfig {
            max_difficulty: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TunnelingRisk { .. })
        ));
    }

    #[test]
    fn test_difficulty_is_monotonic_and_capped() {
        let config = GameConfig::default();
        let mut last = 0.0;
        for score in (0..20_000).step_by(37) {
            let d = config.difficulty_for(score);
            assert!(d >= last);
            assert!(d <= config.max_difficulty);
            last = d;
        }
        assert_eq!(config.difficulty_for(1_000_000), config.max_difficulty);
        assert!((config.difficulty_for(500) - 0.4).abs() < 1e-6);
    }
}
