//! Data-driven game balance
//!
//! Every number the designers might want to tweak lives here. `Tuning::default()`
//! is the shipped balance; a JSON file can override any subset of it because every
//! table is `#[serde(default)]`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::rng::Weighted;
use crate::sim::state::{EnemyKind, PlayBounds, PowerUpKind};

/// Complete balance sheet for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed play-field rectangle (world units)
    pub bounds: PlayBounds,
    /// Distance beyond the field edge at which entities are despawned
    pub despawn_margin: f32,
    pub player: PlayerTuning,
    pub bullets: BulletTuning,
    pub enemies: EnemyTuning,
    pub power_ups: PowerUpTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bounds: PlayBounds::default(),
            despawn_margin: 5.0,
            player: PlayerTuning::default(),
            bullets: BulletTuning::default(),
            enemies: EnemyTuning::default(),
            power_ups: PowerUpTuning::default(),
        }
    }
}

/// Player ship handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Lateral speed (units/sec)
    pub speed: f32,
    pub radius: f32,
    /// Where the ship sits at session start and after a restart
    pub start_pos: Vec2,
    /// Closest the ship may get to the left/right field edge
    pub edge_margin: f32,
    /// Seconds between shots at power level 1
    pub base_fire_interval: f32,
    /// Interval reduction per power level above 1
    pub fire_interval_step: f32,
    /// Bullets leave the ship this far above its centre
    pub muzzle_offset: f32,
    /// Length of the post-hit invincibility window (seconds)
    pub invincibility_secs: f32,
    /// Blink toggles per second while invincible
    pub blink_rate: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 25.0,
            radius: 1.2,
            start_pos: Vec2::new(0.0, -18.0),
            edge_margin: 2.0,
            base_fire_interval: 0.12,
            fire_interval_step: 0.015,
            muzzle_offset: 2.0,
            invincibility_secs: 2.0,
            blink_rate: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub player_radius: f32,
    pub enemy_radius: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            player_speed: 50.0,
            enemy_speed: 20.0,
            player_radius: 0.3,
            enemy_radius: 0.25,
        }
    }
}

/// Enemy spawn director and type table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Spawn interval at wave 1 (seconds)
    pub base_spawn_interval: f32,
    /// Interval reduction per wave
    pub spawn_interval_step: f32,
    /// The interval never drops below this
    pub min_spawn_interval: f32,
    /// Health multiplier gained per wave (`1 + step * (wave - 1)`)
    pub health_scale_per_wave: f32,
    /// Speed multiplier gained per wave
    pub speed_scale_per_wave: f32,
    /// Enemies appear this far above the top edge
    pub spawn_height: f32,
    /// Enemies never spawn closer than this to the left/right edge
    pub spawn_edge_margin: f32,
    /// Enemies hold fire until they are this far below the top edge
    pub fire_ceiling: f32,
    /// Enemy bullets leave this far below the enemy centre
    pub muzzle_offset: f32,
    /// How long the cosmetic hit flash lasts (seconds)
    pub hit_flash_secs: f32,
    pub types: Vec<EnemyTypeSpec>,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_spawn_interval: 1.5,
            spawn_interval_step: 0.1,
            min_spawn_interval: 0.3,
            health_scale_per_wave: 0.2,
            speed_scale_per_wave: 0.1,
            spawn_height: 5.0,
            spawn_edge_margin: 2.0,
            fire_ceiling: 5.0,
            muzzle_offset: 1.5,
            hit_flash_secs: 0.05,
            types: EnemyTypeSpec::default_table(),
        }
    }
}

/// One row of the enemy type table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTypeSpec {
    pub kind: EnemyKind,
    /// Health at wave 1
    pub health: u32,
    /// Descent speed at wave 1 (units/sec)
    pub speed: f32,
    pub points: u64,
    /// Cosmetic, forwarded to the renderer on destruction
    pub color: u32,
    /// Seconds between volleys (0 = never fires)
    pub shoot_rate: f32,
    pub weight: u32,
    /// First wave this type may appear in
    pub unlock_wave: u32,
    pub radius: f32,
}

impl EnemyTypeSpec {
    pub fn default_table() -> Vec<Self> {
        use EnemyKind::*;
        vec![
            Self::row(Basic, 1, 8.0, 100, 0xff6600, 2.0, 40, 1, 1.2),
            Self::row(Fast, 1, 15.0, 150, 0xffff00, 0.0, 25, 2, 1.0),
            Self::row(Tank, 5, 4.0, 300, 0xff0066, 1.5, 15, 3, 2.0),
            Self::row(Zigzag, 2, 10.0, 200, 0x00ff66, 2.5, 15, 2, 1.5),
            Self::row(Bomber, 3, 6.0, 250, 0x9966ff, 0.8, 5, 4, 2.2),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    fn row(
        kind: EnemyKind,
        health: u32,
        speed: f32,
        points: u64,
        color: u32,
        shoot_rate: f32,
        weight: u32,
        unlock_wave: u32,
        radius: f32,
    ) -> Self {
        Self {
            kind,
            health,
            speed,
            points,
            color,
            shoot_rate,
            weight,
            unlock_wave,
            radius,
        }
    }

    /// Whether this type may spawn at `wave`
    #[inline]
    pub fn unlocked_at(&self, wave: u32) -> bool {
        wave >= self.unlock_wave
    }
}

impl Weighted for EnemyTypeSpec {
    fn weight(&self) -> u32 {
        self.weight
    }
}

/// Power-up drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    /// Chance that a destroyed enemy drops a power-up
    pub drop_chance: f32,
    /// Constant fall speed (units/sec)
    pub fall_speed: f32,
    pub radius: f32,
    /// Flat score granted by a `Score` pickup
    pub score_bonus: u64,
    pub types: Vec<PowerUpSpec>,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            drop_chance: 0.15,
            fall_speed: 3.0,
            radius: 1.0,
            score_bonus: 500,
            types: vec![
                PowerUpSpec {
                    kind: PowerUpKind::Power,
                    color: 0x00ffff,
                    weight: 50,
                },
                PowerUpSpec {
                    kind: PowerUpKind::Life,
                    color: 0xff3366,
                    weight: 20,
                },
                PowerUpSpec {
                    kind: PowerUpKind::Score,
                    color: 0xffcc00,
                    weight: 30,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSpec {
    pub kind: PowerUpKind,
    pub color: u32,
    pub weight: u32,
}

impl Weighted for PowerUpSpec {
    fn weight(&self) -> u32 {
        self.weight
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject balance data the simulation would later trip over
    pub fn validate(&self) -> Result<(), TuningError> {
        let b = &self.bounds;
        if b.right <= b.left {
            return Err(TuningError::InvalidValue {
                name: "bounds.right",
                value: b.right,
                expected: "greater than bounds.left",
            });
        }
        if b.top <= b.bottom {
            return Err(TuningError::InvalidValue {
                name: "bounds.top",
                value: b.top,
                expected: "greater than bounds.bottom",
            });
        }
        if !(0.0..=1.0).contains(&self.power_ups.drop_chance) {
            return Err(TuningError::InvalidValue {
                name: "power_ups.drop_chance",
                value: self.power_ups.drop_chance,
                expected: "a probability in [0, 1]",
            });
        }
        if self.enemies.min_spawn_interval <= 0.0 {
            return Err(TuningError::InvalidValue {
                name: "enemies.min_spawn_interval",
                value: self.enemies.min_spawn_interval,
                expected: "a positive number of seconds",
            });
        }
        let start = self.player.start_pos;
        let margin = self.player.edge_margin;
        if start.x < b.left + margin || start.x > b.right - margin {
            return Err(TuningError::InvalidValue {
                name: "player.start_pos.x",
                value: start.x,
                expected: "inside the bounds less player.edge_margin",
            });
        }
        if start.y < b.bottom || start.y > b.top {
            return Err(TuningError::InvalidValue {
                name: "player.start_pos.y",
                value: start.y,
                expected: "between bounds.bottom and bounds.top",
            });
        }
        if self.player.base_fire_interval <= 0.0 {
            return Err(TuningError::InvalidValue {
                name: "player.base_fire_interval",
                value: self.player.base_fire_interval,
                expected: "a positive number of seconds",
            });
        }

        check_table("enemies.types", &self.enemies.types)?;
        check_table("power_ups.types", &self.power_ups.types)?;

        // Something must be able to spawn on wave 1
        let opening: Vec<_> = self
            .enemies
            .types
            .iter()
            .filter(|t| t.unlocked_at(1))
            .collect();
        if opening.is_empty() {
            return Err(TuningError::EmptyTable {
                table: "enemies.types (wave 1)",
            });
        }
        if opening.iter().all(|t| t.weight == 0) {
            return Err(TuningError::ZeroWeight {
                table: "enemies.types (wave 1)",
            });
        }

        Ok(())
    }
}

fn check_table<T: Weighted>(table: &'static str, rows: &[T]) -> Result<(), TuningError> {
    if rows.is_empty() {
        return Err(TuningError::EmptyTable { table });
    }
    if rows.iter().all(|r| r.weight() == 0) {
        return Err(TuningError::ZeroWeight { table });
    }
    Ok(())
}
