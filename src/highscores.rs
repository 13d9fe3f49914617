//! Best score tracking
//!
//! Read once at startup, written back only when a finished run beats it.

use serde::{Deserialize, Serialize};

use crate::persistence::HighScoreStore;

/// The persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Load from a store. Missing or unreadable storage counts as no score.
    pub fn load(store: &impl HighScoreStore) -> Self {
        match store.read_high_score() {
            Ok(Some(best)) => {
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score unavailable ({}), starting fresh", e);
                Self::default()
            }
        }
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true if it set a new best.
    ///
    /// The in-memory best is updated even if the write fails, so the HUD
    /// stays correct for the rest of the session.
    pub fn record(&mut self, score: u64, store: &mut impl HighScoreStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        match store.write_high_score(score) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("New high score {} not saved: {}", score, e),
        }
        true
    }
}
