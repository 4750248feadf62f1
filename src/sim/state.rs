//! Game state and core simulation types
//!
//! Entities are plain data with their own per-tick update rules. The
//! orchestration (who moves when, who collides with whom) lives in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{EntityArena, EntityId};
use super::collision::Rect;
use super::powerups::{PowerupKind, PowerupTimers};
use super::waves::WaveState;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{center_of, heading};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player health reached zero
    GameOver,
    /// Player asked to leave
    Quit,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        self != GamePhase::Playing
    }
}

/// Four-way facing, used for movement and sprite orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Coarse quadrant for an aim angle (screen space, +y down)
    pub fn from_angle(angle: f32) -> Self {
        use std::f32::consts::{FRAC_PI_4, PI};
        if (-FRAC_PI_4..FRAC_PI_4).contains(&angle) {
            Facing::Right
        } else if (FRAC_PI_4..3.0 * FRAC_PI_4).contains(&angle) {
            Facing::Down
        } else if (-3.0 * PI / 4.0..-FRAC_PI_4).contains(&angle) {
            Facing::Up
        } else {
            Facing::Left
        }
    }

    /// Facing from a velocity; ties go to the vertical axis
    pub fn from_velocity(v: Vec2) -> Self {
        if v.x.abs() > v.y.abs() {
            if v.x > 0.0 { Facing::Right } else { Facing::Left }
        } else if v.y > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        }
    }
}

/// Result of `Player::take_damage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield absorbed the hit
    Blocked,
    Hurt,
    Dead,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub health: i32,
    pub score: u64,
    /// Aim angle toward the pointer (radians)
    pub angle: f32,
    pub facing: Facing,
    pub base_speed: f32,
    /// Current speed (base, or boosted while Speed Boost is active)
    pub speed: f32,
    pub powerups: PowerupTimers,
    /// Ticks until the next volley is allowed
    pub shoot_cooldown: u32,
    speed_boost_multiplier: f32,
    rapid_fire_spread: f32,
}

impl Player {
    /// Spawn at the center of the world
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                WORLD_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
                WORLD_HEIGHT / 2.0 - PLAYER_SIZE / 2.0,
            ),
            health: MAX_HEALTH,
            score: 0,
            angle: 0.0,
            facing: Facing::Right,
            base_speed: tuning.player_base_speed,
            speed: tuning.player_base_speed,
            powerups: PowerupTimers::default(),
            shoot_cooldown: 0,
            speed_boost_multiplier: tuning.speed_boost_multiplier,
            rapid_fire_spread: tuning.rapid_fire_spread,
        }
    }

    pub fn center(&self) -> Vec2 {
        center_of(self.pos, PLAYER_SIZE)
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, PLAYER_SIZE)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Step one `speed` in `direction`, staying inside the world
    pub fn walk(&mut self, direction: Facing) {
        let step = match direction {
            Facing::Left => Vec2::new(-self.speed, 0.0),
            Facing::Right => Vec2::new(self.speed, 0.0),
            Facing::Up => Vec2::new(0.0, -self.speed),
            Facing::Down => Vec2::new(0.0, self.speed),
        };
        self.pos = (self.pos + step).clamp(
            Vec2::ZERO,
            Vec2::new(WORLD_WIDTH - PLAYER_SIZE, WORLD_HEIGHT - PLAYER_SIZE),
        );
        self.facing = direction;
    }

    /// Point the avatar at `pointer`
    pub fn update_aim(&mut self, pointer: Vec2) {
        self.angle = crate::angle_between(self.center(), pointer);
        self.facing = Facing::from_angle(self.angle);
    }

    /// Where shots leave the avatar (projectile top-left)
    pub fn muzzle(&self) -> Vec2 {
        self.center() - Vec2::splat(PROJECTILE_SIZE / 2.0)
    }

    /// One volley at the current aim. Cooldown is the caller's job.
    pub fn shoot(&self) -> Vec<Projectile> {
        let origin = self.muzzle();
        if self.powerups.is_active(PowerupKind::RapidFire) {
            [-1.0f32, 0.0, 1.0]
                .into_iter()
                .map(|k| {
                    let angle = self.angle + k * self.rapid_fire_spread;
                    Projectile::new(origin, angle, ProjectileOrigin::Player)
                })
                .collect()
        } else {
            vec![Projectile::new(origin, self.angle, ProjectileOrigin::Player)]
        }
    }

    /// Start (or restart) an effect. Returns the activation message.
    pub fn apply_powerup(&mut self, kind: PowerupKind, duration: u32) -> String {
        self.powerups.set(kind, duration);
        if kind == PowerupKind::SpeedBoost {
            self.speed = self.base_speed * self.speed_boost_multiplier;
        }
        format!("{} activated!", kind.name())
    }

    /// Count every active effect down by one tick, undoing expired ones
    pub fn update_powerups(&mut self) -> Vec<PowerupKind> {
        let expired = self.powerups.tick();
        for kind in &expired {
            if *kind == PowerupKind::SpeedBoost {
                self.speed = self.base_speed;
            }
        }
        expired
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.powerups.is_active(PowerupKind::Shield) {
            return DamageOutcome::Blocked;
        }
        self.health = (self.health - amount).clamp(0, MAX_HEALTH);
        if self.health == 0 {
            DamageOutcome::Dead
        } else {
            DamageOutcome::Hurt
        }
    }
}

/// A zombie shambling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left corner
    pub pos: Vec2,
    pub speed: f32,
    pub facing: Facing,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            speed,
            facing: Facing::Down,
        }
    }

    /// Place just outside a uniformly random screen edge
    pub fn spawn_on_edge(rng: &mut impl Rng, speed: f32) -> Self {
        let max_x = WORLD_WIDTH - ENEMY_SIZE;
        let max_y = WORLD_HEIGHT - ENEMY_SIZE;
        let pos = match rng.random_range(0..4u8) {
            0 => Vec2::new(rng.random_range(0.0..=max_x), -ENEMY_SIZE),
            1 => Vec2::new(WORLD_WIDTH, rng.random_range(0.0..=max_y)),
            2 => Vec2::new(rng.random_range(0.0..=max_x), WORLD_HEIGHT),
            _ => Vec2::new(-ENEMY_SIZE, rng.random_range(0.0..=max_y)),
        };
        Self::new(pos, speed)
    }

    pub fn center(&self) -> Vec2 {
        center_of(self.pos, ENEMY_SIZE)
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, ENEMY_SIZE)
    }

    /// Advance `speed` units toward `target`
    pub fn move_toward(&mut self, target: Vec2) {
        let d = target - self.center();
        let dir = d / d.length().max(ENEMY_MIN_STEER_LENGTH);
        self.pos += dir * self.speed;
        self.facing = Facing::from_velocity(dir);
    }
}

/// Who fired a projectile (visual only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOrigin {
    Player,
    Assistant,
}

/// A bullet flying in a straight line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Top-left corner (also the collision point)
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub origin: ProjectileOrigin,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, origin: ProjectileOrigin) -> Self {
        Self {
            pos,
            angle,
            speed: PROJECTILE_SPEED,
            origin,
        }
    }

    pub fn advance(&mut self) {
        self.pos += heading(self.angle) * self.speed;
    }

    pub fn is_outside_world(&self) -> bool {
        self.pos.x < 0.0
            || self.pos.x > WORLD_WIDTH
            || self.pos.y < 0.0
            || self.pos.y > WORLD_HEIGHT
    }
}

/// A collectible power-up orb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    /// Center of the orb
    pub pos: Vec2,
    pub kind: PowerupKind,
    /// Ticks granted on collection
    pub duration: u32,
    /// Glow pulse phase in [0, 1]
    pub pulse: f32,
    pulse_rising: bool,
    /// Remaining lifetime, if pickups expire
    pub ttl_ticks: Option<u32>,
}

impl Pickup {
    pub fn new(pos: Vec2, kind: PowerupKind, duration: u32, ttl_ticks: Option<u32>) -> Self {
        Self {
            pos,
            kind,
            duration,
            pulse: 0.0,
            pulse_rising: true,
            ttl_ticks,
        }
    }

    /// Animate the pulse and age the pickup. Returns false once expired.
    pub fn update(&mut self) -> bool {
        if self.pulse_rising {
            self.pulse += 0.1;
            if self.pulse >= 1.0 {
                self.pulse = 1.0;
                self.pulse_rising = false;
            }
        } else {
            self.pulse -= 0.1;
            if self.pulse <= 0.0 {
                self.pulse = 0.0;
                self.pulse_rising = true;
            }
        }
        // A TTL of n keeps the pickup on screen for n ticks, spawn tick included
        match self.ttl_ticks.as_mut() {
            Some(ttl) if *ttl > 0 => {
                *ttl -= 1;
                true
            }
            Some(_) => false,
            None => true,
        }
    }
}

/// Decorative rock. Rocks never block anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Always false; kept so renderers can tell rocks apart from walls
    pub blocking: bool,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size,
            blocking: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Rocks are decorative: nothing ever collides with them
    pub fn collides_with(&self, _area: &Rect) -> bool {
        false
    }
}

/// Transient visual effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    BloodSplatter,
    Explosion,
}

impl EffectKind {
    /// Ticks each frame is held
    pub fn frame_delay(self) -> u32 {
        match self {
            EffectKind::BloodSplatter => 3,
            EffectKind::Explosion => 2,
        }
    }
}

/// Animation length of each effect kind, as drawn by the sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectFrames {
    pub blood_splatter: u32,
    pub explosion: u32,
}

impl Default for EffectFrames {
    fn default() -> Self {
        Self {
            blood_splatter: 5,
            explosion: 6,
        }
    }
}

impl EffectFrames {
    pub fn get(&self, kind: EffectKind) -> u32 {
        match kind {
            EffectKind::BloodSplatter => self.blood_splatter,
            EffectKind::Explosion => self.explosion,
        }
    }
}

/// A short-lived animation at a fixed point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualEffect {
    pub kind: EffectKind,
    /// Center of the effect
    pub pos: Vec2,
    pub frame: u32,
    /// Frames before the effect disappears
    pub frames: u32,
    frame_counter: u32,
}

impl VisualEffect {
    pub fn new(kind: EffectKind, pos: Vec2, frames: u32) -> Self {
        Self {
            kind,
            pos,
            frame: 0,
            frames,
            frame_counter: 0,
        }
    }

    /// Advance the animation. Returns false once past the last frame.
    pub fn update(&mut self) -> bool {
        self.frame_counter += 1;
        if self.frame_counter >= self.kind.frame_delay() {
            self.frame += 1;
            self.frame_counter = 0;
        }
        !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }
}

/// A timed on-screen text line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub ticks_left: u32,
}

impl Banner {
    pub fn new(text: impl Into<String>, ticks: u32) -> Self {
        Self {
            text: text.into(),
            ticks_left: ticks,
        }
    }

    /// Count down one tick. Returns false once the banner is gone.
    pub fn tick(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.ticks_left > 0
    }
}

/// Count down an optional banner, clearing it when it runs out
pub(crate) fn tick_banner(banner: &mut Option<Banner>) {
    let expired = banner.as_mut().is_some_and(|b| !b.tick());
    if expired {
        *banner = None;
    }
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Shot { origin: ProjectileOrigin, count: u32 },
    EnemyKilled { at: Vec2 },
    PlayerHurt { health: i32 },
    ShieldBlocked,
    PickupSpawned(PowerupKind),
    PowerupCollected(PowerupKind),
    PowerupExpired(PowerupKind),
    WaveStarted(u32),
    GameOver { score: u64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter (first tick is 1)
    pub tick_count: u64,
    pub player: Player,
    pub enemies: EntityArena<Enemy>,
    pub projectiles: EntityArena<Projectile>,
    pub pickups: EntityArena<Pickup>,
    pub effects: EntityArena<VisualEffect>,
    pub obstacles: Vec<Obstacle>,
    /// Effect lifetimes in frames, set from the sprite manifest
    pub effect_frames: EffectFrames,
    pub waves: WaveState,
    /// Ticks since the last pickup was placed
    pub pickup_timer: u32,
    /// "<Power-up> activated!" line
    pub message: Option<Banner>,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            player: Player::new(&tuning),
            waves: WaveState::new(),
            tuning,
            phase: GamePhase::Playing,
            tick_count: 0,
            enemies: EntityArena::new(),
            projectiles: EntityArena::new(),
            pickups: EntityArena::new(),
            effects: EntityArena::new(),
            obstacles: Vec::new(),
            effect_frames: EffectFrames::default(),
            pickup_timer: 0,
            message: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.scatter_rocks();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn scatter_rocks(&mut self) {
        let medium = (0..self.tuning.medium_rocks).map(|_| (25.0, 40.0));
        let small = (0..self.tuning.small_rocks).map(|_| (10.0, 20.0));
        let sizes: Vec<(f32, f32)> = medium.chain(small).collect();
        for (lo, hi) in sizes {
            let size = self.rng.random_range(lo..=hi);
            let pos = Vec2::new(
                self.rng.random_range(0.0..=WORLD_WIDTH - size),
                self.rng.random_range(0.0..=WORLD_HEIGHT - size),
            );
            self.obstacles.push(Obstacle::new(pos, size));
        }
    }

    pub fn spawn_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.insert(id, enemy);
        id
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile) -> EntityId {
        let id = self.next_entity_id();
        self.projectiles.insert(id, projectile);
        id
    }

    pub fn spawn_pickup(&mut self, pickup: Pickup) -> EntityId {
        let id = self.next_entity_id();
        self.pickups.insert(id, pickup);
        id
    }

    pub fn spawn_effect(&mut self, kind: EffectKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let frames = self.effect_frames.get(kind);
        self.effects.insert(id, VisualEffect::new(kind, pos, frames));
        id
    }

    /// Drop every tombstoned entity. Runs once at the end of a tick.
    pub fn compact(&mut self) {
        self.enemies.compact();
        self.projectiles.compact();
        self.pickups.compact();
        self.effects.compact();
    }

    /// Current wave number (starts at 1)
    pub fn wave(&self) -> u32 {
        self.waves.wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&Tuning::default())
    }

    #[test]
    fn player_starts_centered_with_full_health() {
        let p = player();
        assert_eq!(p.pos, Vec2::new(304.0, 224.0));
        assert_eq!(p.health, 100);
        assert_eq!(p.speed, 5.0);
    }

    #[test]
    fn walk_clamps_to_world() {
        let mut p = player();
        p.pos = Vec2::new(2.0, 2.0);
        p.walk(Facing::Left);
        p.walk(Facing::Up);
        assert_eq!(p.pos, Vec2::ZERO);
        assert_eq!(p.facing, Facing::Up);

        p.pos = Vec2::new(WORLD_WIDTH - PLAYER_SIZE - 1.0, WORLD_HEIGHT - PLAYER_SIZE - 1.0);
        p.walk(Facing::Right);
        p.walk(Facing::Down);
        assert_eq!(p.pos, Vec2::new(WORLD_WIDTH - PLAYER_SIZE, WORLD_HEIGHT - PLAYER_SIZE));
    }

    #[test]
    fn walk_uses_boosted_speed() {
        let mut p = player();
        p.apply_powerup(PowerupKind::SpeedBoost, 10);
        let start = p.pos;
        p.walk(Facing::Right);
        assert_eq!(p.pos.x - start.x, 7.5);
    }

    #[test]
    fn aim_quadrants() {
        let mut p = player();
        let c = p.center();
        p.update_aim(c + Vec2::new(10.0, 1.0));
        assert_eq!(p.facing, Facing::Right);
        p.update_aim(c + Vec2::new(1.0, 10.0));
        assert_eq!(p.facing, Facing::Down);
        p.update_aim(c + Vec2::new(1.0, -10.0));
        assert_eq!(p.facing, Facing::Up);
        p.update_aim(c + Vec2::new(-10.0, 1.0));
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn single_shot_without_rapid_fire() {
        let mut p = player();
        p.angle = 0.3;
        let shots = p.shoot();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].angle, 0.3);
        assert_eq!(shots[0].pos, p.center() - Vec2::splat(2.0));
        assert_eq!(shots[0].origin, ProjectileOrigin::Player);
    }

    #[test]
    fn shield_blocks_damage() {
        let mut p = player();
        p.apply_powerup(PowerupKind::Shield, 5);
        assert_eq!(p.take_damage(25), DamageOutcome::Blocked);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn damage_clamps_at_zero_and_reports_death() {
        let mut p = player();
        assert_eq!(p.take_damage(60), DamageOutcome::Hurt);
        assert_eq!(p.take_damage(60), DamageOutcome::Dead);
        assert_eq!(p.health, 0);
    }

    #[test]
    fn reapplying_speed_boost_does_not_stack() {
        let mut p = player();
        p.apply_powerup(PowerupKind::SpeedBoost, 100);
        p.apply_powerup(PowerupKind::SpeedBoost, 100);
        assert_eq!(p.speed, 7.5);
        assert_eq!(p.powerups.remaining(PowerupKind::SpeedBoost), 100);
    }

    #[test]
    fn enemy_steers_toward_target_and_faces_dominant_axis() {
        let mut e = Enemy::new(Vec2::new(0.0, 0.0), 2.0);
        e.move_toward(Vec2::new(116.0, 16.0));
        assert_eq!(e.pos, Vec2::new(2.0, 0.0));
        assert_eq!(e.facing, Facing::Right);

        let mut e = Enemy::new(Vec2::new(0.0, 0.0), 2.0);
        e.move_toward(Vec2::new(16.0, -84.0));
        assert_eq!(e.facing, Facing::Up);
    }

    #[test]
    fn enemy_on_target_does_not_blow_up() {
        let mut e = Enemy::new(Vec2::new(10.0, 10.0), 2.0);
        e.move_toward(e.center());
        assert!(e.pos.is_finite());
        assert_eq!(e.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn edge_spawns_are_off_screen() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let e = Enemy::spawn_on_edge(&mut rng, 2.0);
            let on_edge = e.pos.y == -ENEMY_SIZE
                || e.pos.y == WORLD_HEIGHT
                || e.pos.x == -ENEMY_SIZE
                || e.pos.x == WORLD_WIDTH;
            assert!(on_edge, "spawned inside the world at {:?}", e.pos);
        }
    }

    #[test]
    fn projectile_flies_straight() {
        let mut shot = Projectile::new(Vec2::new(100.0, 100.0), 0.0, ProjectileOrigin::Player);
        shot.advance();
        assert_eq!(shot.pos, Vec2::new(110.0, 100.0));
        shot.pos.x = WORLD_WIDTH + 0.5;
        assert!(shot.is_outside_world());
    }

    #[test]
    fn effects_expire_after_their_frames() {
        let frames = EffectFrames::default();
        for (kind, want) in [(EffectKind::BloodSplatter, 5 * 3), (EffectKind::Explosion, 6 * 2)] {
            let mut fx = VisualEffect::new(kind, Vec2::ZERO, frames.get(kind));
            let mut ticks = 1;
            while fx.update() {
                ticks += 1;
            }
            assert_eq!(ticks, want, "{kind:?}");
        }
    }

    #[test]
    fn spawned_effects_use_the_configured_frame_count() {
        let mut state = GameState::new(1, Tuning::default());
        state.effect_frames.blood_splatter = 10;
        let id = state.spawn_effect(EffectKind::BloodSplatter, Vec2::ZERO);
        let fx = state.effects.get(id).expect("just spawned");
        assert_eq!(fx.frames, 10);
        assert!(!fx.is_finished());
    }

    #[test]
    fn pickup_ttl_expires() {
        let mut pickup = Pickup::new(Vec2::ZERO, PowerupKind::Shield, 240, Some(2));
        assert!(pickup.update());
        assert!(pickup.update());
        assert!(!pickup.update());

        let mut forever = Pickup::new(Vec2::ZERO, PowerupKind::Shield, 240, None);
        assert!((0..1000).all(|_| forever.update()));
        assert!((0.0..=1.0).contains(&forever.pulse));
    }

    #[test]
    fn rocks_never_collide() {
        let rock = Obstacle::new(Vec2::new(10.0, 10.0), 40.0);
        assert!(!rock.collides_with(&rock.rect()));
        assert!(!rock.blocking);
    }

    #[test]
    fn new_state_scatters_rocks_inside_world() {
        let state = GameState::new(42, Tuning::default());
        assert_eq!(state.obstacles.len(), 23);
        for rock in &state.obstacles {
            assert!(rock.pos.x >= 0.0 && rock.pos.x + rock.size <= WORLD_WIDTH);
            assert!(rock.pos.y >= 0.0 && rock.pos.y + rock.size <= WORLD_HEIGHT);
        }
    }

    #[test]
    fn entity_ids_are_unique_across_kinds() {
        let mut state = GameState::new(1, Tuning::default());
        let a = state.spawn_enemy(Enemy::new(Vec2::ZERO, 1.0));
        let b = state.spawn_effect(EffectKind::Explosion, Vec2::ZERO);
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn health_stays_in_range(hits in proptest::collection::vec(0i32..200, 0..20)) {
            let mut p = player();
            for hit in hits {
                p.take_damage(hit);
                prop_assert!((0..=MAX_HEALTH).contains(&p.health));
            }
        }

        #[test]
        fn aim_facing_is_total(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0) {
            let mut p = player();
            p.update_aim(Vec2::new(x, y));
            prop_assert!(p.angle.is_finite());
        }
    }
}
