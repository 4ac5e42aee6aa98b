//! Player ship: movement, weapon patterns, invincibility

use glam::Vec2;

use super::events::{EventSink, GameEvent};
use super::projectiles;
use super::state::{GameState, Player, PowerLevel};
use super::tick::TickInput;
use crate::tuning::PlayerTuning;

/// One bullet of a shot pattern, relative to the muzzle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub offset: Vec2,
    /// Lateral component of the travel direction (climb is always 1)
    pub dir_x: f32,
    pub damage: f32,
}

impl Shot {
    const fn new(dx: f32, dy: f32, dir_x: f32) -> Self {
        Self {
            offset: Vec2::new(dx, dy),
            dir_x,
            damage: 1.0,
        }
    }

    const fn heavy(dx: f32, dy: f32, damage: f32) -> Self {
        Self {
            offset: Vec2::new(dx, dy),
            dir_x: 0.0,
            damage,
        }
    }
}

const LEVEL_1: &[Shot] = &[Shot::new(0.0, 0.0, 0.0)];
const LEVEL_2: &[Shot] = &[Shot::new(-0.5, 0.0, 0.0), Shot::new(0.5, 0.0, 0.0)];
const LEVEL_3: &[Shot] = &[
    Shot::new(0.0, 0.0, 0.0),
    Shot::new(-0.8, -0.5, -0.15),
    Shot::new(0.8, -0.5, 0.15),
];
const LEVEL_4: &[Shot] = &[
    Shot::new(-0.4, 0.0, 0.0),
    Shot::new(0.4, 0.0, 0.0),
    Shot::new(-1.0, -0.3, -0.2),
    Shot::new(1.0, -0.3, 0.2),
];
const LEVEL_5: &[Shot] = &[
    Shot::heavy(0.0, 0.3, 1.5),
    Shot::new(-0.5, 0.0, 0.0),
    Shot::new(0.5, 0.0, 0.0),
    Shot::new(-1.2, -0.5, -0.25),
    Shot::new(1.2, -0.5, 0.25),
];

/// Bullets emitted per trigger pull at `level`
pub fn pattern(level: PowerLevel) -> &'static [Shot] {
    match level.get() {
        1 => LEVEL_1,
        2 => LEVEL_2,
        3 => LEVEL_3,
        4 => LEVEL_4,
        5 => LEVEL_5,
        other => unreachable!("power level {other} outside 1..=5"),
    }
}

/// Seconds between trigger pulls at `level`
pub fn fire_interval(tuning: &PlayerTuning, level: PowerLevel) -> f32 {
    tuning.base_fire_interval - f32::from(level.get() - 1) * tuning.fire_interval_step
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            pos: tuning.start_pos,
            radius: tuning.radius,
            speed: tuning.speed,
            fire_cooldown: 0.0,
            invincible_timer: 0.0,
            visible: true,
        }
    }

    /// Back to the start position, vulnerable and ready to fire
    pub fn reset(&mut self, tuning: &PlayerTuning) {
        *self = Self::new(tuning);
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn make_invincible(&mut self, tuning: &PlayerTuning) {
        self.invincible_timer = tuning.invincibility_secs;
        self.visible = true;
    }

    /// Count the invincibility window down and update the blink state
    fn tick_invincibility(&mut self, dt: f32, blink_rate: f32) {
        if !self.is_invincible() {
            return;
        }
        self.invincible_timer = (self.invincible_timer - dt).max(0.0);
        self.visible = if self.is_invincible() {
            (self.invincible_timer * blink_rate).floor() as i64 % 2 == 0
        } else {
            true
        };
    }
}

/// The player turn of a frame: steer, shoot, tick invincibility
pub fn update(state: &mut GameState, input: &TickInput, dt: f32, events: &mut impl EventSink) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    let axis = input.move_right as i8 - input.move_left as i8;
    let x = player.pos.x + f32::from(axis) * player.speed * dt;
    player.pos.x = tuning.bounds.clamp_x(x, tuning.player.edge_margin);

    player.fire_cooldown -= dt;
    if input.fire && player.fire_cooldown <= 0.0 {
        let level = state.power_level;
        let muzzle = player.pos + Vec2::new(0.0, tuning.player.muzzle_offset);
        player.fire_cooldown = fire_interval(&tuning.player, level);

        events.emit(GameEvent::PlayerFired {
            level: level.get(),
            pos: muzzle,
        });
        let entities = &mut state.entities;
        for shot in pattern(level) {
            projectiles::fire_player_bullet(
                &mut entities.player_bullets,
                &mut entities.ids,
                muzzle + shot.offset,
                shot.dir_x,
                shot.damage,
                &tuning.bullets,
                events,
            );
        }
    }
    player.fire_cooldown = player.fire_cooldown.max(0.0);

    player.tick_invincibility(dt, tuning.player.blink_rate);
}
