//! Nova Strike - simulation core of a vertically-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound cue queue fed by simulation events
//! - `error`: Configuration errors
//!
//! Rendering, audio synthesis and input capture live outside this crate. The
//! simulation talks to them only through [`sim::EventSink`] notifications and the
//! per-frame [`sim::TickInput`] snapshot.

pub mod audio;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use tuning::Tuning;

/// Fixed game rules (not balance knobs - see [`Tuning`] for those)
pub mod consts {
    /// Score needed per wave step: `wave = score / WAVE_SCORE_STEP + 1`
    pub const WAVE_SCORE_STEP: u64 = 2000;

    /// Lives at the start of a session
    pub const START_LIVES: u8 = 3;
    /// Lives can never be stacked above this
    pub const MAX_LIVES: u8 = 5;

    /// Power level bounds (inclusive)
    pub const MIN_POWER_LEVEL: u8 = 1;
    pub const MAX_POWER_LEVEL: u8 = 5;

    /// Power level the player starts with
    pub const START_POWER_LEVEL: u8 = MIN_POWER_LEVEL;

    /// Simulation step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Wave number for a given score. Pure and non-decreasing in `score`.
#[inline]
pub fn wave_for_score(score: u64) -> u32 {
    (score / consts::WAVE_SCORE_STEP) as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wave_boundaries() {
        assert_eq!(wave_for_score(0), 1);
        assert_eq!(wave_for_score(1999), 1);
        assert_eq!(wave_for_score(2000), 2);
        assert_eq!(wave_for_score(4500), 3);
    }

    proptest! {
        #[test]
        fn wave_matches_formula(score in 0u64..10_000_000) {
            prop_assert_eq!(wave_for_score(score) as u64, score / 2000 + 1);
        }

        #[test]
        fn wave_never_decreases(a in 0u64..10_000_000, b in 0u64..10_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(wave_for_score(lo) <= wave_for_score(hi));
        }
    }
}
