//! One-way notifications from the simulation to its presentation collaborators
//!
//! The renderer, audio and UI never query the simulation mid-frame; they react to
//! these events. Entity ids identify the opaque handle to move or dispose.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{BulletOwner, EnemyKind, PowerUpKind};

/// Everything the simulation announces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Idle -> Running
    GameStarted,
    /// Full reset; every previously announced handle is gone
    GameRestarted,

    EnemySpawned {
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
    },
    /// Bullet damage that did not destroy the enemy
    EnemyHit {
        id: u32,
        pos: Vec2,
        color: u32,
        health: f32,
    },
    /// `kill_shot` is true when a player bullet scored the kill, false when the
    /// enemy rammed the player
    EnemyDestroyed {
        id: u32,
        pos: Vec2,
        color: u32,
        kill_shot: bool,
    },
    /// Left the bottom of the field
    EnemyEscaped {
        id: u32,
    },
    EnemyFired {
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
    },

    /// The player emitted a shot pattern
    PlayerFired {
        level: u8,
        pos: Vec2,
    },
    BulletSpawned {
        id: u32,
        owner: BulletOwner,
        pos: Vec2,
        dir: Vec2,
    },
    BulletDespawned {
        id: u32,
        owner: BulletOwner,
    },

    PowerUpSpawned {
        id: u32,
        pos: Vec2,
        kind: PowerUpKind,
    },
    PowerUpCollected {
        id: u32,
        pos: Vec2,
        kind: PowerUpKind,
    },
    /// Fell off the bottom uncollected
    PowerUpExpired {
        id: u32,
    },

    PlayerHit {
        pos: Vec2,
    },
    /// Last life lost; the session is over
    PlayerDestroyed {
        pos: Vec2,
        final_score: u64,
    },

    ScoreChanged {
        score: u64,
    },
    WaveChanged {
        wave: u32,
    },
    PowerLevelChanged {
        level: u8,
    },
    LivesChanged {
        lives: u8,
    },
}

/// Receiver of simulation notifications
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Collects events for later inspection
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Fan out to two sinks
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: GameEvent) {
        self.0.emit(event.clone());
        self.1.emit(event);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Forwards notifications to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: GameEvent) {
        match &event {
            GameEvent::GameStarted | GameEvent::GameRestarted => log::info!("{event:?}"),
            GameEvent::WaveChanged { wave } => log::info!("Wave {wave}"),
            GameEvent::PlayerDestroyed { final_score, .. } => {
                log::info!("Game over - final score {final_score}")
            }
            GameEvent::PlayerHit { .. }
            | GameEvent::EnemyDestroyed { .. }
            | GameEvent::PowerUpCollected { .. }
            | GameEvent::LivesChanged { .. }
            | GameEvent::PowerLevelChanged { .. } => log::debug!("{event:?}"),
            _ => log::trace!("{event:?}"),
        }
    }
}
