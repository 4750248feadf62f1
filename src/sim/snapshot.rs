//! Render snapshot
//!
//! An owned, serializable picture of one tick. Renderers and input sources
//! read it; nothing in it flows back into the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::powerups::PowerupKind;
use super::state::{Banner, EffectKind, Facing, GamePhase, GameState, ProjectileOrigin};
use crate::assets::AssetBundle;
use crate::consts::TICK_RATE;

/// Ticks over which the wave banner fades out
const WAVE_BANNER_FADE_TICKS: u32 = 60;
/// Ticks over which the activation message fades out
const MESSAGE_FADE_TICKS: u32 = 30;

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Enemy,
    Projectile,
    AssistantProjectile,
    Pickup(PowerupKind),
    Rock,
    BloodSplatter,
    Explosion,
}

/// One thing to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Top-left for boxes, center for pickups and effects
    pub pos: Vec2,
    pub size: f32,
    pub facing: Option<Facing>,
    pub color: [u8; 3],
    /// Animation frame (0 for static sprites)
    pub frame: u32,
}

/// An active power-up in the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudPowerup {
    pub kind: PowerupKind,
    /// Whole seconds left
    pub seconds_left: u32,
    pub color: [u8; 3],
}

/// A banner line with its current opacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerView {
    pub text: String,
    /// 0.0 (gone) to 1.0 (solid)
    pub alpha: f32,
}

impl BannerView {
    fn from_banner(banner: &Banner, fade_ticks: u32, fades: bool) -> Self {
        let alpha = if fades && banner.ticks_left < fade_ticks {
            banner.ticks_left as f32 / fade_ticks as f32
        } else {
            1.0
        };
        Self {
            text: banner.text.clone(),
            alpha,
        }
    }
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub health: i32,
    pub max_health: i32,
    pub score: u64,
    pub wave: u32,
    pub powerups: Vec<HudPowerup>,
    pub wave_banner: Option<BannerView>,
    pub message: Option<BannerView>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    /// Back to front: rocks, effects, pickups, enemies, projectiles, player
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

impl RenderSnapshot {
    /// Capture the current state with fading banners
    pub fn capture(state: &GameState, assets: &AssetBundle) -> Self {
        Self::capture_with(state, assets, true)
    }

    /// Capture the current state; `fades` false keeps banners fully opaque
    pub fn capture_with(state: &GameState, assets: &AssetBundle, fades: bool) -> Self {
        Self {
            tick: state.tick_count,
            phase: state.phase,
            sprites: collect_sprites(state, assets),
            hud: Hud {
                health: state.player.health,
                max_health: crate::consts::MAX_HEALTH,
                score: state.player.score,
                wave: state.waves.wave,
                powerups: state
                    .player
                    .powerups
                    .active()
                    .map(|(kind, ticks)| HudPowerup {
                        kind,
                        seconds_left: ticks / TICK_RATE,
                        color: kind.color(),
                    })
                    .collect(),
                wave_banner: state
                    .waves
                    .banner
                    .as_ref()
                    .map(|b| BannerView::from_banner(b, WAVE_BANNER_FADE_TICKS, fades)),
                message: state
                    .message
                    .as_ref()
                    .map(|b| BannerView::from_banner(b, MESSAGE_FADE_TICKS, fades)),
            },
        }
    }

    pub fn sprites_of(&self, kind: SpriteKind) -> impl Iterator<Item = &Sprite> + '_ {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }

    /// Player sprite (always present)
    pub fn player(&self) -> Option<&Sprite> {
        self.sprites_of(SpriteKind::Player).next()
    }
}

fn collect_sprites(state: &GameState, assets: &AssetBundle) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(
        1 + state.obstacles.len()
            + state.effects.len()
            + state.pickups.len()
            + state.enemies.len()
            + state.projectiles.len(),
    );

    for rock in &state.obstacles {
        sprites.push(Sprite {
            kind: SpriteKind::Rock,
            pos: rock.pos,
            size: rock.size,
            facing: None,
            color: assets.rock.color,
            frame: 0,
        });
    }

    for (_, fx) in state.effects.iter() {
        let style = assets.effect(fx.kind);
        sprites.push(Sprite {
            kind: match fx.kind {
                EffectKind::BloodSplatter => SpriteKind::BloodSplatter,
                EffectKind::Explosion => SpriteKind::Explosion,
            },
            pos: fx.pos,
            size: style.size as f32,
            facing: None,
            color: style.color,
            frame: fx.frame.min(style.frames.saturating_sub(1)),
        });
    }

    for (_, pickup) in state.pickups.iter() {
        sprites.push(Sprite {
            kind: SpriteKind::Pickup(pickup.kind),
            pos: pickup.pos,
            size: assets.pickup.size as f32,
            facing: None,
            color: assets.pickup_color(pickup.kind),
            frame: 0,
        });
    }

    for (_, enemy) in state.enemies.iter() {
        sprites.push(Sprite {
            kind: SpriteKind::Enemy,
            pos: enemy.pos,
            size: assets.enemy.size as f32,
            facing: Some(enemy.facing),
            color: assets.enemy.color,
            frame: 0,
        });
    }

    for (_, shot) in state.projectiles.iter() {
        let (kind, style) = match shot.origin {
            ProjectileOrigin::Player => (SpriteKind::Projectile, &assets.projectile),
            ProjectileOrigin::Assistant => {
                (SpriteKind::AssistantProjectile, &assets.assistant_projectile)
            }
        };
        sprites.push(Sprite {
            kind,
            pos: shot.pos,
            size: style.size as f32,
            facing: None,
            color: style.color,
            frame: 0,
        });
    }

    sprites.push(Sprite {
        kind: SpriteKind::Player,
        pos: state.player.pos,
        size: assets.player.size as f32,
        facing: Some(state.player.facing),
        color: assets.player.color,
        frame: 0,
    });

    sprites
}
