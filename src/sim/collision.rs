//! Collision detection and response
//!
//! Everything here is axis-aligned boxes with open intervals: touching edges
//! do not count. Projectiles collide as a single point (their top-left
//! corner), which lets fast bullets tunnel past a box edge on glancing hits.

use glam::Vec2;

use super::arena::EntityId;
use super::state::{DamageOutcome, EffectKind, GameEvent, GameState};
use super::powerups::PowerupKind;
use crate::center_of;
use crate::consts::*;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn square(min: Vec2, side: f32) -> Self {
        Self::new(min, Vec2::splat(side))
    }

    /// Square of side `side` centered on `center`
    pub fn centered(center: Vec2, side: f32) -> Self {
        Self::square(center - Vec2::splat(side / 2.0), side)
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Interior overlap (shared edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }

    /// Strictly inside
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        self.min.x < p.x && p.x < max.x && self.min.y < p.y && p.y < max.y
    }
}

/// Enemy and player boxes overlap
pub fn enemy_touches_player(enemy_pos: Vec2, player_pos: Vec2) -> bool {
    Rect::square(enemy_pos, ENEMY_SIZE).overlaps(&Rect::square(player_pos, PLAYER_SIZE))
}

/// Projectile point lies strictly inside the enemy box
pub fn projectile_hits_enemy(projectile_pos: Vec2, enemy_pos: Vec2) -> bool {
    Rect::square(enemy_pos, ENEMY_SIZE).contains_point(projectile_pos)
}

/// Player center lies strictly within `PICKUP_REACH` of the pickup center
pub fn player_reaches_pickup(player_pos: Vec2, pickup_pos: Vec2) -> bool {
    let reach = Rect::centered(pickup_pos, PICKUP_REACH * 2.0);
    reach.contains_point(center_of(player_pos, PLAYER_SIZE))
}

/// Tally of one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub enemies_shot: u32,
    pub player_hits: u32,
    pub shield_blocks: u32,
    pub player_died: bool,
}

/// Resolve enemy contacts and projectile hits for the current tick
///
/// Enemies are walked outer, projectiles inner, over id snapshots. Anything
/// removed earlier in the pass is skipped, so an enemy is resolved at most
/// once and a projectile can only ever hit one enemy.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    let projectile_ids = state.projectiles.ids();

    for enemy_id in state.enemies.ids() {
        let Some(enemy_pos) = state.enemies.get(enemy_id).map(|e| e.pos) else {
            continue;
        };

        if enemy_touches_player(enemy_pos, state.player.pos) {
            resolve_contact(state, enemy_id, enemy_pos, &mut report);
            continue;
        }

        for &projectile_id in &projectile_ids {
            let Some(projectile_pos) = state.projectiles.get(projectile_id).map(|p| p.pos) else {
                continue;
            };
            if !projectile_hits_enemy(projectile_pos, enemy_pos) {
                continue;
            }

            state.enemies.remove(enemy_id);
            state.projectiles.remove(projectile_id);
            state.player.score += state.tuning.kill_score;

            let center = center_of(enemy_pos, ENEMY_SIZE);
            state.spawn_effect(EffectKind::BloodSplatter, center);
            state.spawn_effect(EffectKind::Explosion, projectile_pos);
            state.events.push(GameEvent::EnemyKilled { at: center });
            report.enemies_shot += 1;
            log::trace!("projectile {projectile_id:?} killed enemy {enemy_id:?}");
            break;
        }
    }

    report
}

fn resolve_contact(
    state: &mut GameState,
    enemy_id: EntityId,
    enemy_pos: Vec2,
    report: &mut CollisionReport,
) {
    state.enemies.remove(enemy_id);
    state.spawn_effect(EffectKind::BloodSplatter, center_of(enemy_pos, ENEMY_SIZE));

    // Shield soaks any number of hits without wearing down
    if state.player.powerups.is_active(PowerupKind::Shield) {
        state.player.score += state.tuning.shield_block_score;
        state.events.push(GameEvent::ShieldBlocked);
        report.shield_blocks += 1;
        return;
    }

    match state.player.take_damage(state.tuning.contact_damage) {
        DamageOutcome::Blocked => {}
        DamageOutcome::Hurt => {
            report.player_hits += 1;
            state.events.push(GameEvent::PlayerHurt {
                health: state.player.health,
            });
        }
        DamageOutcome::Dead => {
            report.player_hits += 1;
            report.player_died = true;
            state.events.push(GameEvent::PlayerHurt { health: 0 });
        }
    }
}
