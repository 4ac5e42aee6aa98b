//! Nova Strike headless driver
//!
//! Runs one autopiloted session at a fixed 60 Hz step and prints a JSON summary.
//! Useful for balance checks and for reproducing a seed.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use nova_strike::Tuning;
use nova_strike::audio::AudioCues;
use nova_strike::consts::FRAME_DT;
use nova_strike::sim::{GameEvent, GameState, LogSink, TickInput, rng, tick};

#[derive(Parser, Debug)]
#[command(name = "nova-strike")]
#[command(about = "Run a headless, autopiloted Nova Strike session")]
struct Args {
    /// RNG seed (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to run before stopping
    #[arg(short = 't', long, default_value_t = 120.0)]
    seconds: f32,

    /// Balance file overriding the built-in tuning
    #[arg(long, env = "NOVA_STRIKE_TUNING")]
    tuning: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    frames: u64,
    elapsed: f32,
    score: u64,
    wave: u32,
    lives: u8,
    power_level: u8,
    game_over: bool,
    kills: u32,
    rams: u32,
    power_ups: u32,
    sound_cues: usize,
}

/// Counts the events the summary reports
#[derive(Debug, Default)]
struct Tally {
    kills: u32,
    rams: u32,
    power_ups: u32,
}

impl nova_strike::sim::EventSink for Tally {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::EnemyDestroyed { kill_shot: true, .. } => self.kills += 1,
            GameEvent::EnemyDestroyed { kill_shot: false, .. } => self.rams += 1,
            GameEvent::PowerUpCollected { .. } => self.power_ups += 1,
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Seed {seed}, running for {:.0}s", args.seconds);
    let mut rng = rng::seeded(seed);

    let mut state = GameState::new(tuning);
    let mut tally = Tally::default();
    let mut audio = AudioCues::new();
    let mut sound_cues = 0;

    {
        let mut sink = (LogSink, (&mut tally, &mut audio));
        state.start(&mut sink);

        let frame_limit = (args.seconds / FRAME_DT).ceil() as u64;
        while state.is_running() && state.frame < frame_limit {
            let input = TickInput::autopilot(&state);
            tick(&mut state, &input, FRAME_DT, &mut rng, &mut sink);
            sound_cues += sink.1.1.drain().count();
        }
    }

    if state.is_game_over() {
        log::info!("Session ended by game over after {:.1}s", state.elapsed);
    } else {
        log::info!("Time limit reached");
    }

    let summary = Summary {
        seed,
        frames: state.frame,
        elapsed: state.elapsed,
        score: state.score,
        wave: state.wave,
        lives: state.lives,
        power_level: state.power_level.get(),
        game_over: state.is_game_over(),
        kills: tally.kills,
        rams: tally.rams,
        power_ups: tally.power_ups,
        sound_cues,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
