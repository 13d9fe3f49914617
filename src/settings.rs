//! Player preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    /// Pause automatically when the tab is hidden
    pub pause_when_hidden: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            pause_when_hidden: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "carDodger_settings_v1";

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Parse stored JSON, falling back to defaults on anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = crate::persistence::local_storage::storage()
            .ok()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored {
            Some(json) => {
                log::info!("Loaded settings from LocalStorage");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Ok(storage) = crate::persistence::local_storage::storage() else {
            log::warn!("Settings not saved: storage unavailable");
            return;
        };
        if let Ok(json) = serde_json::to_string(self) {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_silences() {
        let mut settings = Settings::default();
        assert!(settings.effective_volume() > 0.0);
        assert!(settings.toggle_mute());
        assert_eq!(settings.effective_volume(), 0.0);
        assert!(!settings.toggle_mute());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "muted": true }"#);
        assert!(settings.muted);
        assert!(settings.pause_when_hidden);
    }

    #[test]
    fn test_garbage_json_is_default() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }
}
