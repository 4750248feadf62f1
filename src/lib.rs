//! Zombie Siege - a top-down wave shooter
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (entities, collisions, waves, power-ups)
//! - `game`: Frame loop orchestrator driving the sim at 60 Hz
//! - `assets`, `audio`: Presentation bundles injected into the orchestrator
//! - `highscores`: Leaderboard collaborator (offline and file-backed)
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::AssetBundle;
pub use audio::{AudioBundle, SoundEffect};
pub use game::{Game, SessionSummary};
pub use highscores::{Leaderboard, LeaderboardClient};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 60;

    /// World dimensions (screen space, origin top-left, +y down)
    pub const WORLD_WIDTH: f32 = 640.0;
    pub const WORLD_HEIGHT: f32 = 480.0;

    /// Player is a 32x32 box
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Every enemy shares the same 32x32 box
    pub const ENEMY_SIZE: f32 = 32.0;
    /// Projectiles are 4x4 but collide as a point (top-left corner)
    pub const PROJECTILE_SIZE: f32 = 4.0;
    /// Constant projectile speed (units per tick)
    pub const PROJECTILE_SPEED: f32 = 10.0;

    pub const MAX_HEALTH: i32 = 100;

    /// Enemies never normalize against a vector shorter than this
    pub const ENEMY_MIN_STEER_LENGTH: f32 = 0.1;

    /// Half-width of the box around a pickup that the player center must enter
    pub const PICKUP_REACH: f32 = 20.0;
    /// Footprint checked against obstacles when placing a pickup
    pub const PICKUP_FOOTPRINT: f32 = 30.0;
    /// Pickups never spawn closer than this to the world edge
    pub const PICKUP_MARGIN: f32 = 50.0;

    /// Assistant fires on every Nth tick while active
    pub const ASSISTANT_FIRE_INTERVAL: u64 = 10;
}

/// Center of an axis-aligned square whose top-left corner is `pos`
#[inline]
pub fn center_of(pos: Vec2, size: f32) -> Vec2 {
    pos + Vec2::splat(size / 2.0)
}

/// Angle (radians) of the vector from `from` to `to`, screen space
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_half_size_in() {
        assert_eq!(center_of(Vec2::new(100.0, 100.0), 32.0), Vec2::new(116.0, 116.0));
    }

    #[test]
    fn angle_between_points_right_and_down() {
        assert_eq!(angle_between(Vec2::ZERO, Vec2::new(10.0, 0.0)), 0.0);
        let down = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((down - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
