//! Power-up drops and their effects

use glam::Vec2;

use super::entities::Entities;
use super::events::{EventSink, GameEvent};
use super::rng::{RandomSource, pick_weighted};
use super::state::{GameState, PlayBounds, PowerUp, PowerUpKind};
use crate::tuning::{PowerUpSpec, PowerUpTuning};

/// Drop a weighted-random power-up at `pos`. Returns its id.
pub fn spawn(
    entities: &mut Entities,
    tuning: &PowerUpTuning,
    pos: Vec2,
    rng: &mut impl RandomSource,
    events: &mut impl EventSink,
) -> u32 {
    let spec: &PowerUpSpec = pick_weighted(&tuning.types, rng);
    let id = entities.ids.next_id();
    entities.power_ups.add(PowerUp {
        id,
        kind: spec.kind,
        color: spec.color,
        pos,
        radius: tuning.radius,
        fall_speed: tuning.fall_speed,
        age: 0.0,
    });
    log::debug!("Dropped {:?} power-up #{id} at {pos:?}", spec.kind);
    events.emit(GameEvent::PowerUpSpawned {
        id,
        pos,
        kind: spec.kind,
    });
    id
}

/// Fall, age, and expire at the bottom of the field
pub fn update(
    entities: &mut Entities,
    bounds: &PlayBounds,
    margin: f32,
    dt: f32,
    events: &mut impl EventSink,
) {
    for power_up in entities.power_ups.iter_mut() {
        power_up.pos.y -= power_up.fall_speed * dt;
        power_up.age += dt;
    }
    entities.power_ups.retain_or(
        |p| !bounds.below_bottom(p.pos, margin),
        |p| events.emit(GameEvent::PowerUpExpired { id: p.id }),
    );
}

/// Grant the effect of a collected power-up
pub fn apply(state: &mut GameState, kind: PowerUpKind, events: &mut impl EventSink) {
    match kind {
        PowerUpKind::Power => state.raise_power(events),
        PowerUpKind::Life => state.gain_life(events),
        PowerUpKind::Score => {
            let bonus = state.tuning.power_ups.score_bonus;
            state.add_score(bonus, events);
        }
    }
}
