//! Power-up kinds, timers, pickup placement, and the assistant turret

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::EntityId;
use super::collision::{Rect, player_reaches_pickup};
use super::state::{Banner, GameEvent, GameState, Pickup, Projectile, ProjectileOrigin};
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Auto-fires at the nearest enemy
    Assistant,
    SpeedBoost,
    /// Negates contact damage
    Shield,
    /// Three-way spread and shorter cooldown
    RapidFire,
}

impl PowerupKind {
    pub const COUNT: usize = 4;
    pub const ALL: [PowerupKind; Self::COUNT] = [
        PowerupKind::Assistant,
        PowerupKind::SpeedBoost,
        PowerupKind::Shield,
        PowerupKind::RapidFire,
    ];

    fn index(self) -> usize {
        match self {
            PowerupKind::Assistant => 0,
            PowerupKind::SpeedBoost => 1,
            PowerupKind::Shield => 2,
            PowerupKind::RapidFire => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerupKind::Assistant => "AI Assistant",
            PowerupKind::SpeedBoost => "Speed Boost",
            PowerupKind::Shield => "Shield",
            PowerupKind::RapidFire => "Rapid Fire",
        }
    }

    /// Identity color for orbs and HUD indicators
    pub fn color(self) -> [u8; 3] {
        match self {
            PowerupKind::Assistant => [0, 200, 255],
            PowerupKind::SpeedBoost => [255, 200, 0],
            PowerupKind::Shield => [200, 0, 255],
            PowerupKind::RapidFire => [255, 50, 50],
        }
    }
}

/// One countdown per power-up kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupTimers {
    remaining: [u32; PowerupKind::COUNT],
}

impl PowerupTimers {
    pub fn remaining(&self, kind: PowerupKind) -> u32 {
        self.remaining[kind.index()]
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.remaining(kind) > 0
    }

    /// Overwrite the countdown (reapplying resets, it never stacks)
    pub fn set(&mut self, kind: PowerupKind, ticks: u32) {
        self.remaining[kind.index()] = ticks;
    }

    /// Decrement every active timer once. Returns kinds that just hit zero.
    pub fn tick(&mut self) -> Vec<PowerupKind> {
        let mut expired = Vec::new();
        for kind in PowerupKind::ALL {
            let t = &mut self.remaining[kind.index()];
            if *t > 0 {
                *t -= 1;
                if *t == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    /// Active kinds with their remaining ticks, in declaration order
    pub fn active(&self) -> impl Iterator<Item = (PowerupKind, u32)> + '_ {
        PowerupKind::ALL
            .into_iter()
            .map(|kind| (kind, self.remaining(kind)))
            .filter(|(_, t)| *t > 0)
    }
}

/// Advance the pickup spawn timer and place a pickup when it fires
pub fn spawn_pickups(state: &mut GameState) -> Option<EntityId> {
    state.pickup_timer += 1;
    if state.pickup_timer < state.tuning.pickup_spawn_interval {
        return None;
    }

    let pos = Vec2::new(
        state.rng.random_range(PICKUP_MARGIN..=WORLD_WIDTH - PICKUP_MARGIN),
        state.rng.random_range(PICKUP_MARGIN..=WORLD_HEIGHT - PICKUP_MARGIN),
    );
    let footprint = Rect::centered(pos, PICKUP_FOOTPRINT);
    if state.obstacles.iter().any(|rock| rock.collides_with(&footprint)) {
        // Keep the timer primed; try a new spot next tick
        return None;
    }

    let kind = PowerupKind::ALL[state.rng.random_range(0..PowerupKind::COUNT)];
    let duration = state.tuning.powerup_duration(kind);
    let ttl = state.tuning.pickup_ttl_ticks;
    let id = state.spawn_pickup(Pickup::new(pos, kind, duration, ttl));
    state.pickup_timer = 0;
    state.events.push(GameEvent::PickupSpawned(kind));
    log::debug!("{} pickup placed at ({:.0}, {:.0})", kind.name(), pos.x, pos.y);
    Some(id)
}

/// Collect every pickup the player is standing on
pub fn collect_pickups(state: &mut GameState) -> Vec<PowerupKind> {
    let mut collected = Vec::new();
    for id in state.pickups.ids() {
        let Some(pickup) = state.pickups.get(id) else {
            continue;
        };
        if !player_reaches_pickup(state.player.pos, pickup.pos) {
            continue;
        }
        let (kind, duration) = (pickup.kind, pickup.duration);
        state.pickups.remove(id);

        let text = state.player.apply_powerup(kind, duration);
        log::debug!("{text} ({duration} ticks)");
        state.message = Some(Banner::new(text, state.tuning.message_ticks));
        state.events.push(GameEvent::PowerupCollected(kind));
        collected.push(kind);
    }
    collected
}

/// Animate pickups and drop any whose lifetime ran out
pub fn update_pickups(state: &mut GameState) {
    let mut expired = Vec::new();
    for (id, pickup) in state.pickups.iter_mut() {
        if !pickup.update() {
            expired.push(id);
        }
    }
    for id in expired {
        state.pickups.remove(id);
    }
}

/// Living enemy whose center is closest to the player's center
pub fn nearest_enemy(state: &GameState) -> Option<(EntityId, Vec2)> {
    let from = state.player.center();
    state
        .enemies
        .iter()
        .map(|(id, enemy)| (id, enemy.center()))
        .min_by(|(_, a), (_, b)| {
            a.distance_squared(from)
                .partial_cmp(&b.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Fire the assistant turret if it is due this tick
pub fn assistant_fire(state: &mut GameState) -> Option<EntityId> {
    if !state.player.powerups.is_active(PowerupKind::Assistant)
        || state.tick_count % ASSISTANT_FIRE_INTERVAL != 0
    {
        return None;
    }
    let (target_id, target) = nearest_enemy(state)?;

    let angle = crate::angle_between(state.player.center(), target);
    let shot = Projectile::new(state.player.muzzle(), angle, ProjectileOrigin::Assistant);
    let id = state.spawn_projectile(shot);
    state.events.push(GameEvent::Shot {
        origin: ProjectileOrigin::Assistant,
        count: 1,
    });
    log::trace!("assistant fired at enemy {target_id:?}");
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Enemy;
    use crate::sim::tick::{TickInput, tick};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    #[test]
    fn timers_expire_exactly_at_zero() {
        let mut timers = PowerupTimers::default();
        timers.set(PowerupKind::Shield, 3);
        timers.set(PowerupKind::RapidFire, 1);

        assert_eq!(timers.tick(), vec![PowerupKind::RapidFire]);
        assert!(timers.tick().is_empty());
        assert_eq!(timers.tick(), vec![PowerupKind::Shield]);
        assert!(timers.tick().is_empty());
        assert_eq!(timers.remaining(PowerupKind::Shield), 0);
    }

    #[test]
    fn active_lists_running_timers_only() {
        let mut timers = PowerupTimers::default();
        timers.set(PowerupKind::SpeedBoost, 9);
        let active: Vec<_> = timers.active().collect();
        assert_eq!(active, vec![(PowerupKind::SpeedBoost, 9)]);
    }

    #[test]
    fn pickup_spawns_on_interval_inside_margins() {
        let mut state = GameState::new(11, Tuning::default());
        for _ in 0..599 {
            assert!(spawn_pickups(&mut state).is_none());
        }
        let id = spawn_pickups(&mut state).expect("pickup due");
        let pickup = state.pickups.get(id).unwrap();
        assert!((PICKUP_MARGIN..=WORLD_WIDTH - PICKUP_MARGIN).contains(&pickup.pos.x));
        assert!((PICKUP_MARGIN..=WORLD_HEIGHT - PICKUP_MARGIN).contains(&pickup.pos.y));
        assert_eq!(pickup.duration, state.tuning.powerup_duration(pickup.kind));
        assert_eq!(state.pickup_timer, 0);
    }

    #[test]
    fn pickups_ignore_rocks_when_placing() {
        let mut state = GameState::new(5, Tuning::default());
        // Bury the whole world under one rock
        state.obstacles = vec![crate::sim::state::Obstacle::new(Vec2::ZERO, 1000.0)];
        state.pickup_timer = 599;
        assert!(spawn_pickups(&mut state).is_some());
    }

    #[test]
    fn pickup_ttl_counts_its_spawn_tick() {
        let tuning = Tuning {
            base_spawn_interval: u32::MAX,
            pickup_spawn_interval: 5,
            pickup_ttl_ticks: Some(3),
            medium_rocks: 0,
            small_rocks: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, tuning);
        // Out of reach of anything placed inside the margins
        state.player.pos = Vec2::ZERO;

        let mut visible = Vec::new();
        for _ in 0..9 {
            tick(&mut state, &TickInput::default());
            if !state.pickups.is_empty() {
                visible.push(state.tick_count);
            }
        }
        assert_eq!(visible, vec![5, 6, 7]);
    }

    #[test]
    fn collecting_applies_and_removes() {
        let mut state = GameState::new(5, Tuning::default());
        let center = state.player.center();
        let id = state.spawn_pickup(Pickup::new(center, PowerupKind::RapidFire, 200, None));

        assert_eq!(collect_pickups(&mut state), vec![PowerupKind::RapidFire]);
        assert!(!state.pickups.is_live(id));
        assert_eq!(state.player.powerups.remaining(PowerupKind::RapidFire), 200);
        let message = state.message.as_ref().map(|m| m.text.as_str());
        assert_eq!(message, Some("Rapid Fire activated!"));
    }

    #[test]
    fn distant_pickup_stays() {
        let mut state = GameState::new(5, Tuning::default());
        let far = state.player.center() + Vec2::new(100.0, 0.0);
        state.spawn_pickup(Pickup::new(far, PowerupKind::Shield, 240, None));
        assert!(collect_pickups(&mut state).is_empty());
        assert_eq!(state.pickups.len(), 1);
    }

    #[test]
    fn assistant_targets_nearest_enemy() {
        let mut state = GameState::new(5, Tuning::default());
        state.player.powerups.set(PowerupKind::Assistant, 100);
        state.tick_count = 20;
        let c = state.player.center();
        state.spawn_enemy(Enemy::new(c + Vec2::new(200.0, 0.0), 0.0));
        let near = state.spawn_enemy(Enemy::new(c + Vec2::new(-16.0, 50.0), 0.0));

        assert_eq!(nearest_enemy(&state).map(|(id, _)| id), Some(near));
        let shot_id = assistant_fire(&mut state).expect("assistant due");
        let shot = state.projectiles.get(shot_id).unwrap();
        assert_eq!(shot.origin, ProjectileOrigin::Assistant);
        // Target center is straight below the player center
        assert!((shot.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn assistant_waits_for_its_tick() {
        let mut state = GameState::new(5, Tuning::default());
        state.player.powerups.set(PowerupKind::Assistant, 100);
        state.spawn_enemy(Enemy::new(Vec2::ZERO, 0.0));
        state.tick_count = 21;
        assert!(assistant_fire(&mut state).is_none());
    }

    proptest! {
        #[test]
        fn timers_count_down_by_one(start in 0u32..500, ticks in 0usize..600) {
            let mut timers = PowerupTimers::default();
            timers.set(PowerupKind::Shield, start);
            let mut last = start;
            for _ in 0..ticks {
                timers.tick();
                let now = timers.remaining(PowerupKind::Shield);
                prop_assert_eq!(now, last.saturating_sub(1));
                last = now;
            }
        }
    }
}
