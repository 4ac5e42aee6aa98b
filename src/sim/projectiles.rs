//! Player and enemy bullets

use glam::Vec2;

use super::entities::{Collection, Entities, IdAllocator};
use super::events::{EventSink, GameEvent};
use super::state::{Bullet, BulletOwner, PlayBounds};
use crate::tuning::BulletTuning;

/// Spawn a player bullet travelling up, optionally angled by `dir_x`.
///
/// Velocity is `(dir_x, 1) * player_speed`, so angled shots keep the same climb
/// rate as straight ones.
pub fn fire_player_bullet(
    bullets: &mut Collection<Bullet>,
    ids: &mut IdAllocator,
    pos: Vec2,
    dir_x: f32,
    damage: f32,
    tuning: &BulletTuning,
    events: &mut impl EventSink,
) -> u32 {
    let dir = Vec2::new(dir_x, 1.0);
    let id = ids.next_id();
    bullets.add(Bullet {
        id,
        owner: BulletOwner::Player,
        pos,
        vel: dir * tuning.player_speed,
        radius: tuning.player_radius,
        damage,
    });
    events.emit(GameEvent::BulletSpawned {
        id,
        owner: BulletOwner::Player,
        pos,
        dir,
    });
    id
}

/// Spawn an enemy bullet along `dir` at `enemy_speed`.
///
/// # Panics
/// If `dir` is the zero vector.
pub fn fire_enemy_bullet(
    bullets: &mut Collection<Bullet>,
    ids: &mut IdAllocator,
    pos: Vec2,
    dir: Vec2,
    tuning: &BulletTuning,
    events: &mut impl EventSink,
) -> u32 {
    assert!(dir != Vec2::ZERO, "enemy bullet needs a non-zero direction");
    let dir = dir.normalize();
    let id = ids.next_id();
    bullets.add(Bullet {
        id,
        owner: BulletOwner::Enemy,
        pos,
        vel: dir * tuning.enemy_speed,
        radius: tuning.enemy_radius,
        damage: 0.0,
    });
    events.emit(GameEvent::BulletSpawned {
        id,
        owner: BulletOwner::Enemy,
        pos,
        dir,
    });
    id
}

impl Bullet {
    /// Whether the bullet has left the field on the side it is heading to
    pub fn is_out(&self, bounds: &PlayBounds, margin: f32) -> bool {
        let past_end = match self.owner {
            BulletOwner::Player => bounds.above_top(self.pos, margin),
            BulletOwner::Enemy => bounds.below_bottom(self.pos, margin),
        };
        past_end || bounds.outside_sides(self.pos, margin)
    }
}

/// Move every bullet and cull the ones that left the field
pub fn update(
    entities: &mut Entities,
    bounds: &PlayBounds,
    margin: f32,
    dt: f32,
    events: &mut impl EventSink,
) {
    for bullets in [&mut entities.player_bullets, &mut entities.enemy_bullets] {
        for bullet in bullets.iter_mut() {
            bullet.pos += bullet.vel * dt;
        }
        bullets.retain_or(
            |b| !b.is_out(bounds, margin),
            |b| {
                events.emit(GameEvent::BulletDespawned {
                    id: b.id,
                    owner: b.owner,
                })
            },
        );
    }
}
