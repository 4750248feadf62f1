//! Sprite descriptors
//!
//! The game ships no image files: every sprite is a colored shape described
//! here. A JSON manifest can restyle them; anything missing or broken falls
//! back to the generated set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{EffectFrames, EffectKind, PowerupKind};

/// How one sprite kind is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteStyle {
    /// Side length in world units
    pub size: u32,
    pub color: [u8; 3],
    /// Animation frames (1 for static sprites)
    pub frames: u32,
}

impl SpriteStyle {
    pub const fn still(size: u32, color: [u8; 3]) -> Self {
        Self { size, color, frames: 1 }
    }

    pub const fn animated(size: u32, color: [u8; 3], frames: u32) -> Self {
        Self { size, color, frames }
    }
}

/// Every sprite the renderer needs, loaded once and shared read-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetBundle {
    pub player: SpriteStyle,
    pub enemy: SpriteStyle,
    pub projectile: SpriteStyle,
    pub assistant_projectile: SpriteStyle,
    /// Pickup orb size; the color comes from the power-up kind
    pub pickup: SpriteStyle,
    /// Rock color; sizes vary per rock
    pub rock: SpriteStyle,
    pub blood_splatter: SpriteStyle,
    pub explosion: SpriteStyle,
}

impl Default for AssetBundle {
    fn default() -> Self {
        Self::generated()
    }
}

impl AssetBundle {
    /// Built-in sprite set
    pub fn generated() -> Self {
        let frames = EffectFrames::default();
        Self {
            player: SpriteStyle::still(PLAYER_SIZE as u32, [0, 100, 255]),
            enemy: SpriteStyle::still(ENEMY_SIZE as u32, [0, 150, 0]),
            projectile: SpriteStyle::still(PROJECTILE_SIZE as u32, [255, 0, 0]),
            assistant_projectile: SpriteStyle::still(PROJECTILE_SIZE as u32, [0, 200, 255]),
            pickup: SpriteStyle::still(PICKUP_FOOTPRINT as u32, [255, 255, 255]),
            rock: SpriteStyle::still(25, [40, 80, 120]),
            blood_splatter: SpriteStyle::animated(40, [150, 0, 0], frames.blood_splatter),
            explosion: SpriteStyle::animated(60, [255, 150, 0], frames.explosion),
        }
    }

    /// Parse a manifest. Fields left out keep their generated style.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let bundle: AssetBundle = serde_json::from_str(json).map_err(|e| e.to_string())?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Load a manifest from disk, falling back to `generated()` on any error
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!(
                    "Could not read assets {}: {err}; using generated sprites",
                    path.display()
                );
                return Self::generated();
            }
        };
        match Self::from_json(&json) {
            Ok(bundle) => {
                log::info!("Loaded sprite manifest from {}", path.display());
                bundle
            }
            Err(err) => {
                log::warn!(
                    "Bad sprite manifest {}: {err}; using generated sprites",
                    path.display()
                );
                Self::generated()
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        let named = [
            ("player", &self.player),
            ("enemy", &self.enemy),
            ("projectile", &self.projectile),
            ("assistant_projectile", &self.assistant_projectile),
            ("pickup", &self.pickup),
            ("rock", &self.rock),
            ("blood_splatter", &self.blood_splatter),
            ("explosion", &self.explosion),
        ];
        for (name, style) in named {
            if style.size == 0 {
                return Err(format!("{name} has zero size"));
            }
            if style.frames == 0 {
                return Err(format!("{name} has no frames"));
            }
        }
        Ok(())
    }

    /// Style for a transient effect
    pub fn effect(&self, kind: EffectKind) -> &SpriteStyle {
        match kind {
            EffectKind::BloodSplatter => &self.blood_splatter,
            EffectKind::Explosion => &self.explosion,
        }
    }

    /// How many frames each effect plays before it is removed
    pub fn effect_frames(&self) -> EffectFrames {
        EffectFrames {
            blood_splatter: self.blood_splatter.frames,
            explosion: self.explosion.frames,
        }
    }

    /// Orb color for a pickup
    pub fn pickup_color(&self, kind: PowerupKind) -> [u8; 3] {
        kind.color()
    }
}
