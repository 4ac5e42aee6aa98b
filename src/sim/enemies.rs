//! Enemy spawn director, movement patterns and volleys

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Entities;
use super::events::{EventSink, GameEvent};
use super::projectiles;
use super::rng::{RandomSource, pick_weighted};
use super::state::{Enemy, EnemyKind, GameState};
use crate::tuning::{EnemyTuning, Tuning};

/// Lateral sine weave layered on the descent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weave {
    pub amplitude: f32,
    pub frequency: f32,
}

/// One barrel of an enemy volley, relative to the enemy's muzzle point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrel {
    pub offset: Vec2,
    pub dir: Vec2,
}

impl Barrel {
    const fn new(dx: f32, dy: f32, dir_x: f32) -> Self {
        Self {
            offset: Vec2::new(dx, dy),
            dir: Vec2::new(dir_x, -1.0),
        }
    }
}

const SINGLE: &[Barrel] = &[Barrel::new(0.0, 0.0, 0.0)];
const TWIN: &[Barrel] = &[Barrel::new(-0.3, 0.0, -0.1), Barrel::new(0.3, 0.0, 0.1)];
const CARPET: &[Barrel] = &[
    Barrel::new(-1.0, 0.0, -0.05),
    Barrel::new(0.0, -0.2, 0.0),
    Barrel::new(1.0, 0.0, 0.05),
];

impl EnemyKind {
    /// Straight divers return `None`
    pub fn weave(self) -> Option<Weave> {
        let (amplitude, frequency) = match self {
            EnemyKind::Basic | EnemyKind::Tank => return None,
            EnemyKind::Fast => (0.5, 4.0),
            EnemyKind::Zigzag => (5.0, 3.0),
            EnemyKind::Bomber => (3.0, 2.0),
        };
        Some(Weave {
            amplitude,
            frequency,
        })
    }

    /// Fixed fan fired on each volley (empty for types that never shoot)
    pub fn volley(self) -> &'static [Barrel] {
        match self {
            EnemyKind::Basic | EnemyKind::Zigzag => SINGLE,
            EnemyKind::Tank => TWIN,
            EnemyKind::Bomber => CARPET,
            EnemyKind::Fast => &[],
        }
    }
}

/// Timer half of the enemy spawn director
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemySpawner {
    /// Seconds since the last spawn
    pub timer: f32,
    /// Enemies spawned this session
    pub spawned: u32,
}

impl EnemySpawner {
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.spawned = 0;
    }

    /// Seconds between spawns at `wave`
    pub fn interval(tuning: &EnemyTuning, wave: u32) -> f32 {
        let steps = wave.saturating_sub(1) as f32;
        let interval = tuning.base_spawn_interval - tuning.spawn_interval_step * steps;
        interval.max(tuning.min_spawn_interval)
    }

    /// Accumulate `dt`; true when an enemy is due (the timer restarts at zero)
    pub fn advance(&mut self, dt: f32, tuning: &EnemyTuning, wave: u32) -> bool {
        self.timer += dt;
        if self.timer >= Self::interval(tuning, wave) {
            self.timer = 0.0;
            self.spawned += 1;
            true
        } else {
            false
        }
    }
}

/// Wave-scaled health, rounded up (`base * (1 + step * (wave - 1))`)
pub fn scaled_health(base: u32, step: f32, wave: u32) -> u32 {
    let scale = 1.0 + step * wave.saturating_sub(1) as f32;
    // Absorb f32 noise so 5 * 1.2 stays 6 and does not round up to 7
    (base as f32 * scale - 1e-4).ceil().max(1.0) as u32
}

/// Wave-scaled speed (`base * (1 + step * (wave - 1))`)
pub fn scaled_speed(base: f32, step: f32, wave: u32) -> f32 {
    base * (1.0 + step * wave.saturating_sub(1) as f32)
}

/// Pick a type unlocked at `wave`, scale it, and place it above the field.
/// Returns the new enemy's id.
pub fn spawn_enemy(
    entities: &mut Entities,
    tuning: &Tuning,
    wave: u32,
    rng: &mut impl RandomSource,
    events: &mut impl EventSink,
) -> u32 {
    let t = &tuning.enemies;
    let available: Vec<_> = t.types.iter().filter(|spec| spec.unlocked_at(wave)).collect();
    let spec = *pick_weighted(&available, rng);

    let bounds = &tuning.bounds;
    let lane = bounds.width() - 2.0 * t.spawn_edge_margin;
    let x = bounds.center_x() + (rng.next_f32() - 0.5) * lane;
    let pos = Vec2::new(x, bounds.top + t.spawn_height);

    let health = scaled_health(spec.health, t.health_scale_per_wave, wave) as f32;
    let id = entities.ids.next_id();
    let enemy = Enemy {
        id,
        kind: spec.kind,
        pos,
        start_x: x,
        radius: spec.radius,
        health,
        max_health: health,
        speed: scaled_speed(spec.speed, t.speed_scale_per_wave, wave),
        points: spec.points,
        color: spec.color,
        shoot_rate: spec.shoot_rate,
        shoot_cooldown: rng.next_f32() * spec.shoot_rate,
        clock: rng.range(0.0, std::f32::consts::TAU),
        hit_flash: 0.0,
    };

    log::debug!("Spawned {:?} #{} at {:?} (hp {})", enemy.kind, id, pos, health);
    events.emit(GameEvent::EnemySpawned {
        id,
        kind: enemy.kind,
        pos,
    });
    entities.enemies.add(enemy);
    id
}

impl Enemy {
    /// Descend, weave and tick cosmetic timers
    pub fn advance(&mut self, dt: f32) {
        self.clock += dt;
        self.pos.y -= self.speed * dt;
        if let Some(weave) = self.kind.weave() {
            self.pos.x = self.start_x + (self.clock * weave.frequency).sin() * weave.amplitude;
        }
        self.hit_flash = (self.hit_flash - dt).max(0.0);
    }

    /// Count the volley cooldown down; true when a volley should fire now
    fn ready_to_fire(&mut self, dt: f32, ceiling: f32) -> bool {
        if self.shoot_rate <= 0.0 {
            return false;
        }
        self.shoot_cooldown -= dt;
        if self.shoot_cooldown <= 0.0 && self.pos.y < ceiling {
            self.shoot_cooldown = self.shoot_rate;
            true
        } else {
            false
        }
    }
}

/// The enemy turn of a frame: spawn if due, then move, fire and cull
pub fn update(
    state: &mut GameState,
    dt: f32,
    rng: &mut impl RandomSource,
    events: &mut impl EventSink,
) {
    if state.spawner.advance(dt, &state.tuning.enemies, state.wave) {
        spawn_enemy(&mut state.entities, &state.tuning, state.wave, rng, events);
    }

    let tuning = &state.tuning;
    let entities = &mut state.entities;
    let ceiling = tuning.bounds.top - tuning.enemies.fire_ceiling;

    for enemy in entities.enemies.iter_mut() {
        enemy.advance(dt);

        if enemy.ready_to_fire(dt, ceiling) {
            let muzzle = enemy.pos - Vec2::new(0.0, tuning.enemies.muzzle_offset);
            events.emit(GameEvent::EnemyFired {
                id: enemy.id,
                kind: enemy.kind,
                pos: muzzle,
            });
            for barrel in enemy.kind.volley() {
                projectiles::fire_enemy_bullet(
                    &mut entities.enemy_bullets,
                    &mut entities.ids,
                    muzzle + barrel.offset,
                    barrel.dir,
                    &tuning.bullets,
                    events,
                );
            }
        }
    }

    let bounds = tuning.bounds;
    let margin = tuning.despawn_margin;
    entities.enemies.retain_or(
        |enemy| !bounds.below_bottom(enemy.pos, margin),
        |enemy| {
            log::trace!("Enemy #{} escaped", enemy.id);
            events.emit(GameEvent::EnemyEscaped { id: enemy.id });
        },
    );
}
