//! Circle-circle collision and the per-frame cross-collection sweeps
//!
//! Sweeps remove entities immediately and stop at the first match (except
//! pickups), so nothing is counted twice within a frame.

use glam::Vec2;

use super::events::{EventSink, GameEvent};
use super::powerups;
use super::rng::RandomSource;
use super::state::{Bullet, Enemy, GameState, Player, PowerUp};

/// Anything with a position and a collision radius
pub trait Collider {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
}

impl Collider for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Collider for Enemy {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Collider for Bullet {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Collider for PowerUp {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// True when the circles overlap. Touching (distance == r1 + r2) is a miss.
#[inline]
pub fn overlaps(a: &impl Collider, b: &impl Collider) -> bool {
    a.position().distance(b.position()) < a.radius() + b.radius()
}

/// Run all four sweeps for this frame
pub fn resolve(state: &mut GameState, rng: &mut impl RandomSource, events: &mut impl EventSink) {
    player_bullets_vs_enemies(state, rng, events);
    if state.is_running() {
        enemy_bullets_vs_player(state, events);
    }
    if state.is_running() {
        enemies_vs_player(state, events);
    }
    if state.is_running() {
        player_vs_power_ups(state, events);
    }
}

/// Each bullet damages at most one enemy and is always consumed
fn player_bullets_vs_enemies(
    state: &mut GameState,
    rng: &mut impl RandomSource,
    events: &mut impl EventSink,
) {
    for i in (0..state.entities.player_bullets.len()).rev() {
        let bullet = &state.entities.player_bullets[i];
        let enemies = &state.entities.enemies;
        let Some(j) = (0..enemies.len()).rev().find(|&j| overlaps(bullet, &enemies[j])) else {
            continue;
        };

        let bullet = state.entities.player_bullets.remove(i);
        events.emit(GameEvent::BulletDespawned {
            id: bullet.id,
            owner: bullet.owner,
        });

        let enemy = &mut state.entities.enemies[j];
        if !enemy.take_damage(bullet.damage) {
            enemy.hit_flash = state.tuning.enemies.hit_flash_secs;
            events.emit(GameEvent::EnemyHit {
                id: enemy.id,
                pos: enemy.pos,
                color: enemy.color,
                health: enemy.health,
            });
            continue;
        }

        let enemy = state.entities.enemies.remove(j);
        log::debug!("{:?} #{} destroyed (+{})", enemy.kind, enemy.id, enemy.points);
        events.emit(GameEvent::EnemyDestroyed {
            id: enemy.id,
            pos: enemy.pos,
            color: enemy.color,
            kill_shot: true,
        });
        state.add_score(enemy.points, events);

        if rng.chance(state.tuning.power_ups.drop_chance) {
            powerups::spawn(
                &mut state.entities,
                &state.tuning.power_ups,
                enemy.pos,
                rng,
                events,
            );
        }
    }
}

/// At most one bullet hit per frame; none while invincible
fn enemy_bullets_vs_player(state: &mut GameState, events: &mut impl EventSink) {
    if state.player.is_invincible() {
        return;
    }
    let player = &state.player;
    let bullets = &state.entities.enemy_bullets;
    let Some(i) = (0..bullets.len()).rev().find(|&i| overlaps(&bullets[i], player)) else {
        return;
    };

    let bullet = state.entities.enemy_bullets.remove(i);
    events.emit(GameEvent::BulletDespawned {
        id: bullet.id,
        owner: bullet.owner,
    });
    state.player_hit(events);
}

/// Ramming destroys the enemy without scoring; at most one per frame
fn enemies_vs_player(state: &mut GameState, events: &mut impl EventSink) {
    if state.player.is_invincible() {
        return;
    }
    let player = &state.player;
    let Some(i) = state.entities.enemies.iter().position(|e| overlaps(e, player)) else {
        return;
    };

    let enemy = state.entities.enemies.remove(i);
    log::debug!("{:?} #{} rammed the player", enemy.kind, enemy.id);
    events.emit(GameEvent::EnemyDestroyed {
        id: enemy.id,
        pos: enemy.pos,
        color: enemy.color,
        kill_shot: false,
    });
    state.player_hit(events);
}

/// Every overlapping pickup is collected
fn player_vs_power_ups(state: &mut GameState, events: &mut impl EventSink) {
    for i in (0..state.entities.power_ups.len()).rev() {
        if !overlaps(&state.entities.power_ups[i], &state.player) {
            continue;
        }
        let power_up = state.entities.power_ups.remove(i);
        log::debug!("Collected {:?} power-up #{}", power_up.kind, power_up.id);
        events.emit(GameEvent::PowerUpCollected {
            id: power_up.id,
            pos: power_up.pos,
            kind: power_up.kind,
        });
        powerups::apply(state, power_up.kind, events);
    }
}
