//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio, or platform dependencies

pub mod arena;
pub mod collision;
pub mod powerups;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod waves;

pub use arena::{EntityArena, EntityId};
pub use collision::{CollisionReport, Rect, resolve_collisions};
pub use powerups::{PowerupKind, PowerupTimers};
pub use snapshot::{BannerView, Hud, HudPowerup, RenderSnapshot, Sprite, SpriteKind};
pub use state::{
    Banner, EffectFrames, EffectKind, Enemy, Facing, GameEvent, GamePhase, GameState, Obstacle,
    Pickup, Player, Projectile, ProjectileOrigin, VisualEffect,
};
pub use tick::{TickInput, tick};
pub use waves::{WaveState, WaveTick, run_scheduler};
