//! Wave progression and enemy spawn cadence
//!
//! Two independent timers: the wave timer bumps the difficulty tier every
//! `wave_duration_ticks`, the spawn timer releases a group of enemies every
//! `spawn_rate` ticks. Difficulty only ever goes up; there is no final wave.

use serde::{Deserialize, Serialize};

use super::state::{Banner, Enemy, GameEvent, GameState, tick_banner};
use crate::tuning::Tuning;

/// Enemies per spawn-second for a wave
pub fn zombies_per_wave(wave: u32) -> u32 {
    1 + wave / 2
}

/// Ticks between spawn groups
pub fn spawn_rate(zombies_per_wave: u32, base_interval: u32, min_interval: u32) -> u32 {
    (base_interval / zombies_per_wave.max(1)).max(min_interval)
}

/// Enemies released together at each spawn
pub fn enemies_per_spawn(wave: u32) -> u32 {
    1 + wave / 3
}

/// Per-enemy speed for a wave, never above `cap`
pub fn enemy_speed(base_speed: f32, wave: u32, per_wave: f32, cap: f32) -> f32 {
    (base_speed * (1.0 + wave as f32 * per_wave)).min(cap)
}

/// What the scheduler decided this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveTick {
    /// Set when a new wave started this tick
    pub new_wave: Option<u32>,
    /// Enemies to release this tick
    pub spawn_count: u32,
}

/// Scheduler state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave (starts at 1)
    pub wave: u32,
    /// Ticks elapsed in the current wave
    pub wave_timer: u32,
    pub zombies_per_wave: u32,
    /// Ticks since the last spawn group
    pub spawn_timer: u32,
    /// "Wave N incoming!" line
    pub banner: Option<Banner>,
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveState {
    pub fn new() -> Self {
        Self {
            wave: 1,
            wave_timer: 0,
            zombies_per_wave: zombies_per_wave(1),
            spawn_timer: 0,
            banner: None,
        }
    }

    pub fn spawn_rate(&self, tuning: &Tuning) -> u32 {
        spawn_rate(self.zombies_per_wave, tuning.base_spawn_interval, tuning.min_spawn_interval)
    }

    /// Advance both timers by one tick
    pub fn advance(&mut self, tuning: &Tuning) -> WaveTick {
        let mut out = WaveTick::default();
        tick_banner(&mut self.banner);

        self.wave_timer += 1;
        if self.wave_timer >= tuning.wave_duration_ticks {
            self.wave += 1;
            self.wave_timer = 0;
            self.zombies_per_wave = zombies_per_wave(self.wave);
            self.banner = Some(Banner::new(
                format!("Wave {} incoming!", self.wave),
                tuning.wave_banner_ticks,
            ));
            out.new_wave = Some(self.wave);
        }

        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_rate(tuning) {
            out.spawn_count = enemies_per_spawn(self.wave);
            self.spawn_timer = 0;
        }

        out
    }
}

/// Run the scheduler for one tick and release any enemies it asks for
pub fn run_scheduler(state: &mut GameState) -> WaveTick {
    let step = state.waves.advance(&state.tuning);

    if let Some(wave) = step.new_wave {
        log::info!(
            "Wave {wave} incoming: {} zombies/s, spawn every {} ticks",
            state.waves.zombies_per_wave,
            state.waves.spawn_rate(&state.tuning)
        );
        state.events.push(GameEvent::WaveStarted(wave));
    }

    if step.spawn_count > 0 {
        let t = &state.tuning;
        let speed = enemy_speed(
            t.enemy_base_speed,
            state.waves.wave,
            t.enemy_speed_per_wave,
            t.enemy_speed_cap,
        );
        for _ in 0..step.spawn_count {
            let enemy = Enemy::spawn_on_edge(&mut state.rng, speed);
            state.spawn_enemy(enemy);
        }
        log::trace!("spawned {} enemies at speed {speed:.2}", step.spawn_count);
    }

    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wave_one_spawns_one_enemy_per_second() {
        let tuning = Tuning::default();
        let mut waves = WaveState::new();
        let spawns: Vec<u32> = (1..=120)
            .map(|_| waves.advance(&tuning).spawn_count)
            .collect();
        assert_eq!(spawns.iter().sum::<u32>(), 2);
        assert_eq!(spawns[59], 1);
        assert_eq!(spawns[119], 1);
    }

    #[test]
    fn wave_advances_exactly_on_duration() {
        let tuning = Tuning::default();
        let mut waves = WaveState::new();
        for _ in 0..1799 {
            assert_eq!(waves.advance(&tuning).new_wave, None);
        }
        assert_eq!(waves.advance(&tuning).new_wave, Some(2));
        assert_eq!(waves.wave, 2);
        assert_eq!(waves.wave_timer, 0);
        assert_eq!(waves.zombies_per_wave, 2);
        assert_eq!(waves.banner.as_ref().map(|b| b.text.as_str()), Some("Wave 2 incoming!"));
    }

    #[test]
    fn banner_lasts_its_configured_ticks() {
        let tuning = Tuning::default();
        let mut waves = WaveState::new();
        waves.wave_timer = tuning.wave_duration_ticks - 1;
        waves.advance(&tuning);
        let mut visible = 1;
        while waves.banner.is_some() {
            waves.advance(&tuning);
            if waves.banner.is_some() {
                visible += 1;
            }
        }
        assert_eq!(visible, tuning.wave_banner_ticks);
    }

    #[test]
    fn spawn_rate_floors_at_minimum() {
        assert_eq!(spawn_rate(1, 60, 10), 60);
        assert_eq!(spawn_rate(4, 60, 10), 15);
        assert_eq!(spawn_rate(50, 60, 10), 10);
    }

    #[test]
    fn group_size_grows_every_third_wave() {
        assert_eq!(enemies_per_spawn(1), 1);
        assert_eq!(enemies_per_spawn(3), 2);
        assert_eq!(enemies_per_spawn(9), 4);
    }

    #[test]
    fn speed_caps_at_wave_100() {
        assert_eq!(enemy_speed(2.0, 100, 0.1, 4.0), 4.0);
        assert!((enemy_speed(2.0, 1, 0.1, 4.0) - 2.2).abs() < 1e-6);
    }

    #[test]
    fn scheduler_spawns_enemies_into_state() {
        let mut state = GameState::new(9, Tuning::default());
        for _ in 0..60 {
            run_scheduler(&mut state);
        }
        assert_eq!(state.enemies.len(), 1);
        let (_, enemy) = state.enemies.iter().next().unwrap();
        assert!((enemy.speed - 2.2).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn zombies_per_wave_never_decreases(wave in 1u32..10_000) {
            prop_assert!(zombies_per_wave(wave + 1) >= zombies_per_wave(wave));
        }

        #[test]
        fn enemy_speed_never_exceeds_cap(wave in 1u32..1_000_000) {
            prop_assert!(enemy_speed(2.0, wave, 0.1, 4.0) <= 4.0);
        }

        #[test]
        fn one_wave_per_duration(waves_to_run in 1u32..5) {
            let tuning = Tuning {
                wave_duration_ticks: 30,
                ..Tuning::default()
            };
            let mut waves = WaveState::new();
            let mut started = Vec::new();
            for _ in 0..(30 * waves_to_run) {
                if let Some(w) = waves.advance(&tuning).new_wave {
                    started.push(w);
                }
            }
            let expected: Vec<u32> = (2..=waves_to_run + 1).collect();
            prop_assert_eq!(started, expected);
        }
    }
}
