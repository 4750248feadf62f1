//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so a JSON file can override
//! it without touching the simulation. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::PowerupKind;

/// Duration granted by each power-up kind (ticks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupDurations {
    pub assistant: u32,
    pub speed_boost: u32,
    pub shield: u32,
    pub rapid_fire: u32,
}

impl Default for PowerupDurations {
    fn default() -> Self {
        Self {
            assistant: 300,
            speed_boost: 180,
            shield: 240,
            rapid_fire: 200,
        }
    }
}

impl PowerupDurations {
    pub fn get(&self, kind: PowerupKind) -> u32 {
        match kind {
            PowerupKind::Assistant => self.assistant,
            PowerupKind::SpeedBoost => self.speed_boost,
            PowerupKind::Shield => self.shield,
            PowerupKind::RapidFire => self.rapid_fire,
        }
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Base movement speed (units per tick)
    pub player_base_speed: f32,
    /// Damage taken per enemy contact
    pub contact_damage: i32,
    /// Ticks between volleys (normal fire and spacebar)
    pub fire_cooldown: u32,
    /// Ticks between volleys while Rapid Fire is active
    pub rapid_fire_cooldown: u32,
    /// Angular offset of the outer Rapid Fire shots (radians)
    pub rapid_fire_spread: f32,
    /// Speed multiplier while Speed Boost is active
    pub speed_boost_multiplier: f32,

    // === Scoring ===
    pub kill_score: u64,
    pub shield_block_score: u64,

    // === Enemies and waves ===
    pub enemy_base_speed: f32,
    /// Per-wave speed growth (fraction of base speed)
    pub enemy_speed_per_wave: f32,
    /// Hard cap on enemy speed regardless of wave
    pub enemy_speed_cap: f32,
    pub wave_duration_ticks: u32,
    pub wave_banner_ticks: u32,
    /// Spawn interval at one enemy per spawn-second
    pub base_spawn_interval: u32,
    /// Floor on the spawn interval
    pub min_spawn_interval: u32,

    // === Pickups ===
    pub pickup_spawn_interval: u32,
    /// Pickups vanish after this many ticks (never, when `None`)
    pub pickup_ttl_ticks: Option<u32>,
    pub powerup_durations: PowerupDurations,
    /// How long "<Power-up> activated!" stays on screen
    pub message_ticks: u32,

    // === Decoration ===
    pub medium_rocks: u32,
    pub small_rocks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_base_speed: 5.0,
            contact_damage: 25,
            fire_cooldown: 10,
            rapid_fire_cooldown: 5,
            rapid_fire_spread: 0.1,
            speed_boost_multiplier: 1.5,

            kill_score: 10,
            shield_block_score: 5,

            enemy_base_speed: 2.0,
            enemy_speed_per_wave: 0.1,
            enemy_speed_cap: 4.0,
            wave_duration_ticks: 1800,
            wave_banner_ticks: 180,
            base_spawn_interval: 60,
            min_spawn_interval: 10,

            pickup_spawn_interval: 600,
            pickup_ttl_ticks: None,
            powerup_durations: PowerupDurations::default(),
            message_ticks: 120,

            medium_rocks: 8,
            small_rocks: 15,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Invalid tuning file {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read tuning {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Configured duration for a power-up kind
    pub fn powerup_duration(&self, kind: PowerupKind) -> u32 {
        self.powerup_durations.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let json = r#"{ "kill_score": 25, "powerup_durations": { "shield": 10 } }"#;
        let tuning = Tuning::from_json(json).expect("valid json");
        assert_eq!(tuning.kill_score, 25);
        assert_eq!(tuning.powerup_duration(PowerupKind::Shield), 10);
        assert_eq!(tuning.powerup_duration(PowerupKind::RapidFire), 200);
        assert_eq!(tuning.wave_duration_ticks, 1800);
    }

    #[test]
    fn load_falls_back_on_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert_eq!(Tuning::load(file.path()), Tuning::default());
    }

    #[test]
    fn load_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Tuning::load(&dir.path().join("nope.json")), Tuning::default());
    }
}
