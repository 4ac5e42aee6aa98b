//! Sound cues driven by simulation events
//!
//! Synthesis happens elsewhere; this module only decides which effect to play and
//! how loud, and queues it for the synthesiser to drain once per frame.

use std::collections::VecDeque;

use crate::sim::events::{EventSink, GameEvent};

/// Explosion variants, by how much was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionSize {
    Small,
    Medium,
    Large,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Session start or restart
    Start,
    /// Player trigger pull
    Shoot,
    /// Enemy volley
    EnemyShoot,
    Explosion(ExplosionSize),
    /// Pickup collected
    PowerUp,
    /// Player lost a life
    PlayerHit,
    GameOver,
    /// A new wave began
    WaveStart,
}

impl SoundEffect {
    /// Mix level of this effect before the master volume
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Shoot => 0.15,
            SoundEffect::EnemyShoot => 0.08,
            SoundEffect::Explosion(_) => 0.25,
            SoundEffect::PowerUp | SoundEffect::Start | SoundEffect::GameOver => 0.3,
            SoundEffect::PlayerHit => 0.35,
            SoundEffect::WaveStart => 0.2,
        }
    }

    /// The effect announcing `event`, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let effect = match event {
            GameEvent::GameStarted | GameEvent::GameRestarted => SoundEffect::Start,
            GameEvent::PlayerFired { .. } => SoundEffect::Shoot,
            GameEvent::EnemyFired { .. } => SoundEffect::EnemyShoot,
            GameEvent::EnemyHit { .. } => SoundEffect::Explosion(ExplosionSize::Small),
            GameEvent::EnemyDestroyed { kill_shot: true, .. } => {
                SoundEffect::Explosion(ExplosionSize::Medium)
            }
            GameEvent::EnemyDestroyed { kill_shot: false, .. } => {
                SoundEffect::Explosion(ExplosionSize::Large)
            }
            GameEvent::PowerUpCollected { .. } => SoundEffect::PowerUp,
            GameEvent::PlayerHit { .. } => SoundEffect::PlayerHit,
            GameEvent::PlayerDestroyed { .. } => SoundEffect::GameOver,
            GameEvent::WaveChanged { wave } if *wave > 1 => SoundEffect::WaveStart,
            _ => return None,
        };
        Some(effect)
    }
}

/// A queued effect at its final volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    pub volume: f32,
}

/// Event sink that turns notifications into queued sound cues
#[derive(Debug, Clone)]
pub struct AudioCues {
    queue: VecDeque<Cue>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioCues {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCues {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            master_volume: 0.3,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.queue.clear();
        }
    }

    /// Flip mute and return the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Queue an effect directly
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted || self.master_volume <= 0.0 {
            return;
        }
        self.queue.push_back(Cue {
            effect,
            volume: self.master_volume * effect.base_volume(),
        });
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take every queued cue, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = Cue> + '_ {
        self.queue.drain(..)
    }
}

impl EventSink for AudioCues {
    fn emit(&mut self, event: GameEvent) {
        if let Some(effect) = SoundEffect::for_event(&event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_events_map_to_cues() {
        let mut audio = AudioCues::new();
        audio.emit(GameEvent::PlayerFired {
            level: 1,
            pos: Vec2::ZERO,
        });
        audio.emit(GameEvent::ScoreChanged { score: 100 });
        audio.emit(GameEvent::EnemyDestroyed {
            id: 1,
            pos: Vec2::ZERO,
            color: 0,
            kill_shot: false,
        });
        let cues: Vec<_> = audio.drain().map(|c| c.effect).collect();
        assert_eq!(
            cues,
            vec![
                SoundEffect::Shoot,
                SoundEffect::Explosion(ExplosionSize::Large)
            ]
        );
        assert_eq!(audio.pending(), 0);
    }

    #[test]
    fn test_first_wave_is_silent() {
        assert_eq!(SoundEffect::for_event(&GameEvent::WaveChanged { wave: 1 }), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WaveChanged { wave: 2 }),
            Some(SoundEffect::WaveStart)
        );
    }

    #[test]
    fn test_volume_scales_with_master() {
        let mut audio = AudioCues::new();
        audio.play(SoundEffect::PlayerHit);
        let cue = audio.drain().next().unwrap();
        assert!((cue.volume - 0.3 * 0.35).abs() < 1e-6);

        audio.set_master_volume(2.0);
        assert_eq!(audio.master_volume(), 1.0);
    }

    #[test]
    fn test_mute_drops_cues() {
        let mut audio = AudioCues::new();
        audio.play(SoundEffect::Shoot);
        assert!(audio.toggle_mute());
        assert_eq!(audio.pending(), 0);
        audio.play(SoundEffect::Shoot);
        assert_eq!(audio.pending(), 0);
        assert!(!audio.toggle_mute());
        audio.play(SoundEffect::Shoot);
        assert_eq!(audio.pending(), 1);
    }
}
