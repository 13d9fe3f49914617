//! High score persistence
//!
//! A single best-score integer keyed by one application-wide identifier.
//! Storage failures are never fatal: callers treat them as "no score saved".

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,
    #[error("Stored value {0:?} is not a score")]
    Corrupt(String),
    #[error("Failed to write {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Backend holding the persisted best score
pub trait HighScoreStore {
    /// `Ok(None)` when nothing has been saved yet
    fn read_high_score(&self) -> Result<Option<u64>, StorageError>;

    fn write_high_score(&mut self, score: u64) -> Result<(), StorageError>;
}

/// In-memory store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self {
            value: Some(score),
            writes: 0,
        }
    }

    pub fn value(&self) -> Option<u64> {
        self.value
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn read_high_score(&self) -> Result<Option<u64>, StorageError> {
        Ok(self.value)
    }

    fn write_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        self.value = Some(score);
        self.writes += 1;
        Ok(())
    }
}

/// Parse a stored score string
pub fn parse_score(raw: &str) -> Result<u64, StorageError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| StorageError::Corrupt(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read_high_score(), Ok(None));
        store.write_high_score(350).unwrap();
        assert_eq!(store.read_high_score(), Ok(Some(350)));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("200"), Ok(200));
        assert_eq!(parse_score(" 42\n"), Ok(42));
        assert!(matches!(parse_score("abc"), Err(StorageError::Corrupt(_))));
        assert!(matches!(parse_score("-5"), Err(StorageError::Corrupt(_))));
    }
}
