//! Game state and core simulation types
//!
//! Entity data lives here; the per-entity behaviour is implemented next to the
//! director that owns each kind (`player`, `enemies`, `projectiles`, `powerups`).

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemies::EnemySpawner;
use super::entities::Entities;
use super::events::{EventSink, GameEvent};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::wave_for_score;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, waiting for `start`
    Idle,
    /// Active gameplay
    Running,
    /// Last life lost; frozen until `restart`
    GameOver,
}

/// Axis-aligned play field in world units (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for PlayBounds {
    fn default() -> Self {
        Self {
            left: -15.0,
            right: 15.0,
            top: 25.0,
            bottom: -25.0,
        }
    }
}

impl PlayBounds {
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    /// Clamp `x` to `[left + margin, right - margin]`
    #[inline]
    pub fn clamp_x(&self, x: f32, margin: f32) -> f32 {
        x.clamp(self.left + margin, self.right - margin)
    }

    #[inline]
    pub fn above_top(&self, pos: Vec2, margin: f32) -> bool {
        pos.y > self.top + margin
    }

    #[inline]
    pub fn below_bottom(&self, pos: Vec2, margin: f32) -> bool {
        pos.y < self.bottom - margin
    }

    #[inline]
    pub fn outside_sides(&self, pos: Vec2, margin: f32) -> bool {
        pos.x < self.left - margin || pos.x > self.right + margin
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Zigzag,
    Bomber,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// +1 power level
    Power,
    /// +1 life
    Life,
    /// Flat score bonus
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// The player's ship. Created once per session and repositioned on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Lateral speed (units/sec)
    pub speed: f32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
    /// Seconds of invincibility left (0 = vulnerable)
    pub invincible_timer: f32,
    /// Cosmetic blink state while invincible
    pub visible: bool,
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Weave centre line
    pub start_x: f32,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Descent speed (units/sec)
    pub speed: f32,
    pub points: u64,
    pub color: u32,
    /// Seconds between volleys (0 = never fires)
    pub shoot_rate: f32,
    pub shoot_cooldown: f32,
    /// Movement clock, started at a random phase
    pub clock: f32,
    /// Cosmetic hit flash countdown
    #[serde(default)]
    pub hit_flash: f32,
}

impl Enemy {
    /// Apply `damage` and report whether the enemy is now destroyed.
    ///
    /// # Panics
    /// On negative damage.
    pub fn take_damage(&mut self, damage: f32) -> bool {
        assert!(damage >= 0.0, "negative damage {damage} applied to enemy {}", self.id);
        self.health -= damage;
        self.health <= 0.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// A projectile (player or enemy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub owner: BulletOwner,
    pub pos: Vec2,
    /// Units/sec
    pub vel: Vec2,
    pub radius: f32,
    /// Damage dealt on hit (player bullets only)
    pub damage: f32,
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub color: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Units/sec downward
    pub fall_speed: f32,
    /// Seconds since spawn (drives the renderer's pulse)
    pub age: f32,
}

/// Player power level, always within `MIN_POWER_LEVEL..=MAX_POWER_LEVEL`.
/// Snapshots carry it as a bare number and out-of-range values are rejected on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PowerLevel(u8);

/// A power level outside `MIN_POWER_LEVEL..=MAX_POWER_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPowerLevel(pub u8);

impl fmt::Display for InvalidPowerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "power level {} out of range {MIN_POWER_LEVEL}..={MAX_POWER_LEVEL}",
            self.0
        )
    }
}

impl std::error::Error for InvalidPowerLevel {}

impl TryFrom<u8> for PowerLevel {
    type Error = InvalidPowerLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if (MIN_POWER_LEVEL..=MAX_POWER_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InvalidPowerLevel(level))
        }
    }
}

impl From<PowerLevel> for u8 {
    fn from(level: PowerLevel) -> u8 {
        level.0
    }
}

impl Default for PowerLevel {
    fn default() -> Self {
        Self(START_POWER_LEVEL)
    }
}

impl PowerLevel {
    /// # Panics
    /// If `level` is outside `1..=5`.
    pub fn new(level: u8) -> Self {
        match Self::try_from(level) {
            Ok(level) => level,
            Err(err) => panic!("{err}"),
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// +1, capped. Returns whether the level changed.
    pub fn raise(&mut self) -> bool {
        let before = self.0;
        self.0 = (self.0 + 1).min(MAX_POWER_LEVEL);
        self.0 != before
    }

    /// -1, floored. Returns whether the level changed.
    pub fn lower(&mut self) -> bool {
        let before = self.0;
        self.0 = self.0.saturating_sub(1).max(MIN_POWER_LEVEL);
        self.0 != before
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance data, fixed for the session
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Always `wave_for_score(score)` after a frame completes
    pub wave: u32,
    pub power_level: PowerLevel,
    pub player: Player,
    pub entities: Entities,
    pub spawner: EnemySpawner,
    /// Frames simulated while running
    pub frame: u64,
    /// Simulated seconds while running
    pub elapsed: f32,
}

impl GameState {
    /// Create an idle session
    pub fn new(tuning: Tuning) -> Self {
        let player = Player::new(&tuning.player);
        Self {
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            lives: START_LIVES,
            wave: 1,
            power_level: PowerLevel::default(),
            player,
            entities: Entities::default(),
            spawner: EnemySpawner::default(),
            frame: 0,
            elapsed: 0.0,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Idle -> Running. Returns false (and changes nothing) from any other phase.
    pub fn start(&mut self, events: &mut impl EventSink) -> bool {
        if self.phase != GamePhase::Idle {
            log::warn!("start() ignored in phase {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::Running;
        log::info!("Session started");
        events.emit(GameEvent::GameStarted);
        true
    }

    /// Reset score, lives, wave, power level and every entity, then run.
    /// Accepted from any phase.
    pub fn restart(&mut self, events: &mut impl EventSink) {
        self.score = 0;
        self.lives = START_LIVES;
        self.wave = 1;
        self.power_level = PowerLevel::default();
        self.player.reset(&self.tuning.player);
        self.entities.clear();
        self.spawner.reset();
        self.frame = 0;
        self.elapsed = 0.0;
        self.phase = GamePhase::Running;

        log::info!("Session restarted");
        events.emit(GameEvent::GameRestarted);
        events.emit(GameEvent::ScoreChanged { score: self.score });
        events.emit(GameEvent::WaveChanged { wave: self.wave });
        events.emit(GameEvent::LivesChanged { lives: self.lives });
        events.emit(GameEvent::PowerLevelChanged {
            level: self.power_level.get(),
        });
    }

    pub fn add_score(&mut self, points: u64, events: &mut impl EventSink) {
        self.score += points;
        events.emit(GameEvent::ScoreChanged { score: self.score });
    }

    /// +1 life, capped at `MAX_LIVES`
    pub fn gain_life(&mut self, events: &mut impl EventSink) {
        self.lives = (self.lives + 1).min(MAX_LIVES);
        events.emit(GameEvent::LivesChanged { lives: self.lives });
    }

    pub fn raise_power(&mut self, events: &mut impl EventSink) {
        self.power_level.raise();
        events.emit(GameEvent::PowerLevelChanged {
            level: self.power_level.get(),
        });
    }

    /// Advance the wave if the score has crossed a threshold. Never goes back.
    pub fn check_wave_progression(&mut self, events: &mut impl EventSink) {
        let wave = wave_for_score(self.score);
        if wave > self.wave {
            self.wave = wave;
            log::info!("Wave {} reached at score {}", wave, self.score);
            events.emit(GameEvent::WaveChanged { wave });
        }
    }

    /// The player took a bullet or rammed an enemy.
    ///
    /// Costs a life; the last life ends the session, otherwise the player gets an
    /// invincibility window and drops one power level.
    pub fn player_hit(&mut self, events: &mut impl EventSink) {
        let pos = self.player.pos;
        self.lives = self.lives.saturating_sub(1);
        events.emit(GameEvent::PlayerHit { pos });
        events.emit(GameEvent::LivesChanged { lives: self.lives });

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over at wave {} with score {}", self.wave, self.score);
            events.emit(GameEvent::PlayerDestroyed {
                pos,
                final_score: self.score,
            });
            return;
        }

        self.player.make_invincible(&self.tuning.player);
        if self.power_level.lower() {
            events.emit(GameEvent::PowerLevelChanged {
                level: self.power_level.get(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running() -> GameState {
        let mut state = GameState::new(Tuning::default());
        state.start(&mut Vec::new());
        state
    }

    #[test]
    fn test_new_session_is_idle() {
        let state = GameState::new(Tuning::default());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.lives, 3);
        assert_eq!(state.wave, 1);
        assert_eq!(state.power_level.get(), 1);
        assert_eq!(state.player.pos, Vec2::new(0.0, -18.0));
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut state = GameState::new(Tuning::default());
        let mut events = Vec::new();
        assert!(state.start(&mut events));
        assert!(!state.start(&mut events));
        assert_eq!(events, vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_take_damage_reports_destruction() {
        let mut enemy = Enemy {
            id: 1,
            kind: EnemyKind::Tank,
            pos: Vec2::ZERO,
            start_x: 0.0,
            radius: 2.0,
            health: 5.0,
            max_health: 5.0,
            speed: 4.0,
            points: 300,
            color: 0,
            shoot_rate: 1.5,
            shoot_cooldown: 1.0,
            clock: 0.0,
            hit_flash: 0.0,
        };
        assert!(!enemy.take_damage(1.5));
        assert_eq!(enemy.health, 3.5);
        assert!(!enemy.take_damage(2.5));
        assert_eq!(enemy.health, 1.0);
        assert!(enemy.take_damage(1.0));
        assert!(!enemy.is_alive());
    }

    #[test]
    #[should_panic(expected = "negative damage")]
    fn test_negative_damage_panics() {
        let mut state = running();
        let mut rng = crate::sim::rng::SequenceSource::constant(0.0);
        let id = crate::sim::enemies::spawn_enemy(
            &mut state.entities,
            &state.tuning,
            state.wave,
            &mut rng,
            &mut Vec::new(),
        );
        let enemy = state
            .entities
            .enemies
            .iter_mut()
            .find(|e| e.id == id)
            .unwrap();
        enemy.take_damage(-1.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_power_level_out_of_range_panics() {
        PowerLevel::new(6);
    }

    #[test]
    fn test_power_level_snapshot_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<PowerLevel>("3").unwrap().get(), 3);
        assert_eq!(serde_json::to_string(&PowerLevel::new(4)).unwrap(), "4");
        for bad in ["0", "6", "9"] {
            let err = serde_json::from_str::<PowerLevel>(bad).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{bad}: {err}");
        }

        let mut snapshot = serde_json::to_value(running()).unwrap();
        snapshot["power_level"] = serde_json::json!(0);
        assert!(serde_json::from_value::<GameState>(snapshot).is_err());
    }

    #[test]
    fn test_hit_costs_life_and_power() {
        let mut state = running();
        state.power_level = PowerLevel::new(3);
        let mut events = Vec::new();
        state.player_hit(&mut events);
        assert_eq!(state.lives, 2);
        assert_eq!(state.power_level.get(), 2);
        assert!(state.player.is_invincible());
        assert!(state.is_running());
        assert!(events.contains(&GameEvent::PowerLevelChanged { level: 2 }));
    }

    #[test]
    fn test_hit_at_level_one_keeps_level() {
        let mut state = running();
        let mut events = Vec::new();
        state.player_hit(&mut events);
        assert_eq!(state.power_level.get(), 1);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::PowerLevelChanged { .. })));
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = running();
        state.lives = 1;
        let mut events = Vec::new();
        state.player_hit(&mut events);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.is_invincible());
        assert!(matches!(
            events.last(),
            Some(GameEvent::PlayerDestroyed { .. })
        ));
    }

    #[test]
    fn test_lives_capped() {
        let mut state = running();
        for _ in 0..10 {
            state.gain_life(&mut Vec::new());
        }
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_wave_progression_is_monotonic() {
        let mut state = running();
        let mut events = Vec::new();
        state.add_score(4500, &mut events);
        state.check_wave_progression(&mut events);
        assert_eq!(state.wave, 3);
        assert!(events.contains(&GameEvent::WaveChanged { wave: 3 }));

        // Only `restart` ever lowers the wave
        state.score = 0;
        state.check_wave_progression(&mut events);
        assert_eq!(state.wave, 3);
    }

    proptest! {
        #[test]
        fn power_level_stays_in_bounds(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut level = PowerLevel::default();
            for up in ops {
                if up { level.raise(); } else { level.lower(); }
                prop_assert!((MIN_POWER_LEVEL..=MAX_POWER_LEVEL).contains(&level.get()));
            }
        }
    }
}
