//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Frame-stepped only, driven by the caller's delta
//! - Every random draw goes through an injected [`RandomSource`]
//! - Stable iteration order (insertion order within each collection)
//! - No rendering, audio or platform dependencies; output is [`GameEvent`]s

pub mod collision;
pub mod enemies;
pub mod entities;
pub mod events;
pub mod player;
pub mod powerups;
pub mod projectiles;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{Collider, overlaps};
pub use enemies::EnemySpawner;
pub use entities::{Collection, Entities, IdAllocator};
pub use events::{EventSink, GameEvent, LogSink, NullSink};
pub use rng::{RandomSource, SequenceSource, Weighted, pick_weighted, select_by_draw};
pub use state::{
    Bullet, BulletOwner, Enemy, EnemyKind, GamePhase, GameState, PlayBounds, Player, PowerLevel,
    PowerUp, PowerUpKind,
};
pub use tick::{InputAction, TickInput, tick};
