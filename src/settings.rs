//! Game settings and preferences
//!
//! Persisted as JSON next to the binary, separately from tuning. Unknown or
//! missing fields fall back to defaults so old files keep loading.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Play sound effects at all
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Temporarily silence without losing volume levels
    pub muted: bool,
    /// Loop the background track
    pub music_enabled: bool,
    /// Music volume (0.0 - 1.0), kept under the effects by default
    pub music_volume: f32,

    // === Frame loop ===
    /// Sleep out the rest of each frame to hold the tick rate
    pub frame_pacing: bool,
    /// Frames per second the pacer aims for
    pub target_tick_rate: u32,
    /// Ticks between HUD log lines (0 disables)
    pub hud_log_interval: u64,

    // === Accessibility ===
    /// Reduced motion (no banner fades)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            music_enabled: true,
            music_volume: 0.5,

            // Frame loop
            frame_pacing: true,
            target_tick_rate: crate::consts::TICK_RATE,
            hud_log_interval: 300,

            // Accessibility
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Whether banners fade out (respects reduced_motion)
    pub fn effective_fades(&self) -> bool {
        !self.reduced_motion
    }

    /// Pull out-of-range values back into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.target_tick_rate = self.target_tick_rate.max(1);
        self
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!(
                    "Could not read settings {}: {err}; using defaults",
                    path.display()
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(err) => {
                log::warn!("Invalid settings file {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_volumes() {
        let settings = Settings {
            master_volume: -1.0,
            music_volume: 3.0,
            target_tick_rate: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.master_volume, 0.0);
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.target_tick_rate, 1);
    }

    #[test]
    fn reduced_motion_disables_fades() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_fades());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            master_volume: 0.25,
            reduced_motion: true,
            hud_log_interval: 60,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "muted": true, "master_volume": 7.0 }"#).unwrap();

        let settings = Settings::load(&path);
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.target_tick_rate, 60);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{{{").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        assert_eq!(Settings::load(&dir.path().join("missing.json")), Settings::default());
    }
}
