//! Asset loading fan-in
//!
//! The host starts one load per named resource and reports each outcome here.
//! Loading completes once every name has reported, successfully or not; a
//! failed resource never holds up the rest. Generic over the resource type so
//! tests can feed in fakes.

use std::collections::HashMap;

use thiserror::Error;

/// Sprites used by the game, by name and URL
pub const SPRITES: &[(&str, &str)] = &[
    ("road", "assets/road.svg"),
    ("player", "assets/player.svg"),
    ("enemy", "assets/enemy.svg"),
    ("coin", "assets/coin.svg"),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Failed to load {name}: {reason}")]
    Failed { name: String, reason: String },
    #[error("Unknown asset {0}")]
    Unknown(String),
    #[error("Asset {0} reported twice")]
    Duplicate(String),
    #[error("{pending} assets still loading")]
    Incomplete { pending: usize },
}

/// Tracks outstanding loads until every named resource has reported
#[derive(Debug)]
pub struct AssetFanIn<R> {
    pending: Vec<String>,
    total: usize,
    loaded: HashMap<String, R>,
    failed: Vec<AssetError>,
}

impl<R> AssetFanIn<R> {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut pending: Vec<String> = names.into_iter().map(Into::into).collect();
        pending.sort();
        pending.dedup();
        let total = pending.len();
        Self {
            pending,
            total,
            loaded: HashMap::new(),
            failed: Vec::new(),
        }
    }

    /// Record one outcome. Returns `Ok(true)` on the report that completes
    /// the fan-in.
    pub fn report(&mut self, name: &str, outcome: Result<R, AssetError>) -> Result<bool, AssetError> {
        let Some(index) = self.pending.iter().position(|n| n == name) else {
            return if self.loaded.contains_key(name) || self.failed_names().any(|n| n == name) {
                Err(AssetError::Duplicate(name.to_string()))
            } else {
                Err(AssetError::Unknown(name.to_string()))
            };
        };
        let name = self.pending.swap_remove(index);

        match outcome {
            Ok(resource) => {
                log::debug!("Loaded asset {}", name);
                self.loaded.insert(name, resource);
            }
            Err(e) => {
                let reason = match e {
                    AssetError::Failed { reason, .. } => reason,
                    other => other.to_string(),
                };
                log::warn!("Asset {} failed to load: {}", name, reason);
                self.failed.push(AssetError::Failed { name, reason });
            }
        }
        Ok(self.is_complete())
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Fraction of resources that have reported, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.pending.len()) as f32 / self.total as f32
    }

    fn failed_names(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().filter_map(|e| match e {
            AssetError::Failed { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Hand over the loaded set once every resource has reported
    pub fn finish(self) -> Result<LoadedAssets<R>, AssetError> {
        if !self.is_complete() {
            return Err(AssetError::Incomplete {
                pending: self.pending.len(),
            });
        }
        if !self.failed.is_empty() {
            log::warn!(
                "{} of {} assets failed to load; using placeholders",
                self.failed.len(),
                self.total
            );
        }
        Ok(LoadedAssets {
            resources: self.loaded,
            failed: self.failed,
        })
    }
}

/// Everything that loaded, plus what didn't
#[derive(Debug)]
pub struct LoadedAssets<R> {
    resources: HashMap<String, R>,
    failed: Vec<AssetError>,
}

impl<R> LoadedAssets<R> {
    /// `None` for a failed resource; draw a placeholder instead
    pub fn get(&self, name: &str) -> Option<&R> {
        self.resources.get(name)
    }

    pub fn failures(&self) -> &[AssetError] {
        &self.failed
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
