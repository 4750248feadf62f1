//! Fixed timestep simulation tick
//!
//! Advances the whole world by one step. Movement is a fixed distance per
//! tick, so a slower host slows the game down instead of changing physics.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::powerups::{self, PowerupKind};
use super::state::{Facing, GameEvent, GamePhase, GameState, ProjectileOrigin, tick_banner};
use super::waves::run_scheduler;

/// Input sampled once at the start of a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Pointer position in world space
    pub pointer: Vec2,
    /// Primary fire (mouse button)
    pub fire: bool,
    /// Alternate fire (spacebar), always on the normal cooldown
    pub fire_alt: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Leave the session
    pub quit: bool,
}

impl TickInput {
    /// Held directions in the order they are applied
    pub fn directions(&self) -> impl Iterator<Item = Facing> + '_ {
        [
            (self.left, Facing::Left),
            (self.right, Facing::Right),
            (self.up, Facing::Up),
            (self.down, Facing::Down),
        ]
        .into_iter()
        .filter_map(|(held, dir)| held.then_some(dir))
    }
}

/// Advance the game state by one fixed step
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase.is_terminal() {
        return;
    }
    state.events.clear();
    state.tick_count += 1;

    if input.quit {
        log::info!("Quit requested at tick {}", state.tick_count);
        state.phase = GamePhase::Quit;
        return;
    }

    // Player: aim, shoot, move
    state.player.update_aim(input.pointer);
    handle_fire(state, input);
    for dir in input.directions() {
        state.player.walk(dir);
    }

    // Scheduler may release new enemies
    run_scheduler(state);

    // Enemies close in, then everything that touches gets resolved
    let target = state.player.center();
    for (_, enemy) in state.enemies.iter_mut() {
        enemy.move_toward(target);
    }
    let report = resolve_collisions(state);

    for (_, shot) in state.projectiles.iter_mut() {
        shot.advance();
    }
    state.projectiles.remove_where(|shot| shot.is_outside_world());

    if report.player_died || state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.player.score,
        });
        log::info!(
            "Game over on wave {} with score {} after {} ticks",
            state.waves.wave,
            state.player.score,
            state.tick_count
        );
    }

    // Power-up timers
    for kind in state.player.update_powerups() {
        log::debug!("{} expired", kind.name());
        state.events.push(GameEvent::PowerupExpired(kind));
    }

    // Pickups
    tick_banner(&mut state.message);
    powerups::spawn_pickups(state);
    powerups::collect_pickups(state);
    powerups::update_pickups(state);

    // Transient effects
    for (_, fx) in state.effects.iter_mut() {
        fx.update();
    }
    state.effects.remove_where(|fx| fx.is_finished());

    powerups::assistant_fire(state);

    state.compact();
}

fn handle_fire(state: &mut GameState, input: &TickInput) {
    if input.fire && state.player.shoot_cooldown == 0 {
        fire_volley(state);
        state.player.shoot_cooldown = if state.player.powerups.is_active(PowerupKind::RapidFire) {
            state.tuning.rapid_fire_cooldown
        } else {
            state.tuning.fire_cooldown
        };
    }
    if state.player.shoot_cooldown > 0 {
        state.player.shoot_cooldown -= 1;
    }
    if input.fire_alt && state.player.shoot_cooldown == 0 {
        fire_volley(state);
        state.player.shoot_cooldown = state.tuning.fire_cooldown;
    }
}

fn fire_volley(state: &mut GameState) {
    let volley = state.player.shoot();
    let count = volley.len() as u32;
    for shot in volley {
        state.spawn_projectile(shot);
    }
    state.events.push(GameEvent::Shot {
        origin: ProjectileOrigin::Player,
        count,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EffectKind, Enemy};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Tuning with no enemy or pickup spawns, so tests control the world
    fn calm() -> Tuning {
        Tuning {
            base_spawn_interval: u32::MAX,
            pickup_spawn_interval: u32::MAX,
            medium_rocks: 0,
            small_rocks: 0,
            ..Tuning::default()
        }
    }

    #[test]
    fn quit_ends_session() {
        let mut state = GameState::new(1, calm());
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit);
        assert_eq!(state.phase, GamePhase::Quit);

        let before = state.tick_count;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.tick_count, before);
    }

    #[test]
    fn fire_respects_cooldown() {
        let mut state = GameState::new(1, calm());
        let fire = TickInput {
            fire: true,
            pointer: Vec2::new(0.0, 240.0),
            ..Default::default()
        };
        let mut shots = 0;
        for _ in 0..30 {
            tick(&mut state, &fire);
            shots += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::Shot { origin: ProjectileOrigin::Player, .. }))
                .count();
        }
        assert_eq!(shots, 3);
    }

    #[test]
    fn rapid_fire_halves_cooldown() {
        let mut state = GameState::new(1, calm());
        state.player.powerups.set(PowerupKind::RapidFire, 1000);
        let fire = TickInput {
            fire: true,
            pointer: Vec2::new(0.0, 240.0),
            ..Default::default()
        };
        let mut volleys = 0;
        for _ in 0..30 {
            tick(&mut state, &fire);
            volleys += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::Shot { count: 3, .. }))
                .count();
        }
        assert_eq!(volleys, 6);
    }

    #[test]
    fn projectiles_leave_the_world() {
        let mut state = GameState::new(1, calm());
        let fire = TickInput {
            fire: true,
            pointer: Vec2::new(640.0, 240.0),
            ..Default::default()
        };
        tick(&mut state, &fire);
        assert_eq!(state.projectiles.len(), 1);
        for _ in 0..40 {
            let aim = TickInput {
                pointer: Vec2::new(640.0, 240.0),
                ..Default::default()
            };
            tick(&mut state, &aim);
        }
        assert!(state.projectiles.is_empty());
        assert_eq!(state.projectiles.slot_count(), 0);
    }

    #[test]
    fn held_keys_move_player() {
        let mut state = GameState::new(1, calm());
        let start = state.player.pos;
        let walk = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        tick(&mut state, &walk);
        assert_eq!(state.player.pos, start + Vec2::new(-5.0, -5.0));
        assert_eq!(state.player.facing, Facing::Up);
    }

    #[test]
    fn lethal_hit_ends_game() {
        let mut state = GameState::new(1, calm());
        state.player.health = 25;
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        state.spawn_enemy(Enemy::new(pos, 0.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn effects_fade_and_compact() {
        let mut state = GameState::new(1, calm());
        state.spawn_effect(EffectKind::Explosion, Vec2::new(50.0, 50.0));
        for _ in 0..12 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.effects.is_empty());
        assert_eq!(state.effects.slot_count(), 0);
    }

    #[test]
    fn activation_message_counts_down() {
        let mut state = GameState::new(1, Tuning { message_ticks: 3, ..calm() });
        let center = state.player.center();
        state.spawn_pickup(crate::sim::state::Pickup::new(center, PowerupKind::Shield, 240, None));
        tick(&mut state, &TickInput::default());
        assert!(state.message.is_some());
        for _ in 0..3 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.message.is_none());
    }

    proptest! {
        #[test]
        fn health_stays_in_range_under_random_play(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), 0.0f32..640.0, 0.0f32..480.0),
                1..400,
            ),
        ) {
            let tuning = Tuning {
                wave_duration_ticks: 60,
                ..Tuning::default()
            };
            let mut state = GameState::new(seed, tuning);
            for (fire, left, down, px, py) in inputs {
                let input = TickInput {
                    fire,
                    left,
                    down,
                    pointer: Vec2::new(px, py),
                    ..Default::default()
                };
                tick(&mut state, &input);
                prop_assert!((0..=100).contains(&state.player.health));
                for kind in PowerupKind::ALL {
                    prop_assert!(state.player.powerups.remaining(kind) <= 300);
                }
            }
        }
    }
}
