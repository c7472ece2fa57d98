//! Player preferences
//!
//! Persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Sound and accessibility preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Global mute toggle (the speaker button)
    pub sound_off: bool,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Skip the bounce animation
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_off: false,
            music_volume: 0.5,
            sfx_volume: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "pangolin_settings";

    /// Flip the mute toggle, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_off = !self.sound_off;
        self.sound_off
    }

    pub fn effective_music_volume(&self) -> f32 {
        if self.sound_off {
            0.0
        } else {
            self.music_volume.clamp(0.0, 1.0)
        }
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_off {
            0.0
        } else {
            self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Bounce height to draw for a simulated jump offset
    pub fn displayed_jump(&self, jump_offset: f32) -> f32 {
        if self.reduced_motion { 0.0 } else { jump_offset }
    }

    pub fn load() -> Self {
        match storage::load_json(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
