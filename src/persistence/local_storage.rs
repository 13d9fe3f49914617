//! LocalStorage backend (wasm only)

use super::{HighScoreStore, StorageError, parse_score};

/// Browser LocalStorage handle, if the page is allowed to use it
pub fn storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StorageError::Unavailable)
}

/// High score stored as a decimal string under a fixed key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl HighScoreStore for LocalStorageStore {
    fn read_high_score(&self) -> Result<Option<u64>, StorageError> {
        let storage = storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(raw)) => parse_score(&raw).map(Some),
            Ok(None) => Ok(None),
            Err(_) => Err(StorageError::Unavailable),
        }
    }

    fn write_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        let storage = storage()?;
        storage
            .set_item(&self.key, &score.to_string())
            .map_err(|e| StorageError::Write {
                key: self.key.clone(),
                reason: format!("{e:?}"),
            })
    }
}
