//! Site settings and preferences
//!
//! Persisted as JSON, separately from the raw audio state keys.

use serde::{Deserialize, Serialize};

/// User-tweakable site preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Narrate entry labels and the intro announcement
    pub speech_enabled: bool,
    /// Decorative floating particles
    pub particles: bool,
    /// Minimize motion (disables particles and the name typewriter)
    pub reduced_motion: bool,
    /// Background audio volume (0.0 - 1.0)
    pub audio_volume: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speech_enabled: true,
            particles: true,
            reduced_motion: false,
            audio_volume: crate::consts::AUDIO_VOLUME,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bk_settings";

    /// Effective particle toggle (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Effective name-typewriter toggle (respects reduced_motion)
    pub fn effective_typewriter(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings, writing the defaults on first run so the stored blob
    /// is there to hand-edit.
    pub fn load_or_init() -> Self {
        match crate::storage::get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    settings
                }
                Err(err) => {
                    log::warn!("Stored settings unreadable ({err}), using defaults");
                    Self::default()
                }
            },
            None => {
                let settings = Self::default();
                settings.save();
                log::info!("Using default settings");
                settings
            }
        }
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            crate::storage::set(Self::STORAGE_KEY, &json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip() {
        let settings = Settings {
            speech_enabled: false,
            particles: true,
            reduced_motion: true,
            audio_volume: 0.5,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(!back.speech_enabled);
        assert!(back.reduced_motion);
        assert_eq!(back.audio_volume, 0.5);
    }

    #[test]
    fn test_reduced_motion_disables_decor() {
        let mut settings = Settings::default();
        assert!(settings.effective_particles());
        assert!(settings.effective_typewriter());
        settings.reduced_motion = true;
        assert!(!settings.effective_particles());
        assert!(!settings.effective_typewriter());
    }
}
