//! Flappy Birb entry point
//!
//! Headless native runner: drives the simulation at a fixed timestep with the
//! idle autopilot at the controls, and logs what a renderer would be told.

use std::path::PathBuf;

use anyhow::ensure;
use clap::Parser;

use flappy_birb::consts::*;
use flappy_birb::sim::{EngineCommand, GameEvent, GameState, Phase, TickInput, tick};
use flappy_birb::{JsonFileStore, Tuning};

/// Frame time of the simulated display
const FRAME_DT: f32 = 1.0 / 60.0;
/// Seconds the game-over screen stays up before the autopilot taps again
const GAME_OVER_HOLD: f32 = 1.0;

#[derive(Parser, Debug)]
#[command(name = "flappy-birb", about = "Run Flappy Birb sessions headlessly on autopilot")]
struct Args {
    /// Number of sessions to play
    #[arg(long, default_value_t = 3)]
    sessions: u32,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,

    /// RNG seed for obstacle placement
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,

    /// Tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Best score file
    #[arg(long, default_value = "flappy-birb-best.json")]
    save: PathBuf,
}

/// Game instance holding all state
struct Game {
    state: GameState,
    store: JsonFileStore,
    accumulator: f32,
    input: TickInput,
    /// Time spent on the game-over screen
    over_for: f32,
    sessions_finished: u32,
}

impl Game {
    fn new(seed: u64, tuning: Tuning, store: JsonFileStore) -> flappy_birb::Result<Self> {
        let mut state = GameState::new(seed, tuning)?;
        state.start(&store);
        Ok(Self {
            state,
            store,
            accumulator: 0.0,
            input: TickInput {
                tap: false,
                idle_mode: true,
            },
            over_for: 0.0,
            sessions_finished: 0,
        })
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        if self.state.session.phase == Phase::GameOver {
            self.over_for += dt;
            if self.over_for >= GAME_OVER_HOLD {
                self.input.tap = true;
                self.over_for = 0.0;
            }
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT, &mut self.store);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.tap = false;
        }

        self.present();
    }

    /// Stand-in for the renderer/audio: consume everything the core queued
    fn present(&mut self) {
        for command in self.state.drain_commands() {
            match command {
                EngineCommand::Spawn(entity) => {
                    log::trace!("spawn {:?} #{} at {:?}", entity.tag, entity.id, entity.pos)
                }
                EngineCommand::Despawn(id) => log::trace!("despawn #{id}"),
                EngineCommand::SetScoreText(text) => log::debug!("score label: {text}"),
                EngineCommand::ShowMessage(text) => log::info!("{text}"),
                EngineCommand::ClearMessage => log::trace!("clear message"),
                EngineCommand::Pause => log::trace!("pause scene"),
                EngineCommand::Resume => log::trace!("resume scene"),
            }
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::GameOver(summary) => {
                    self.sessions_finished += 1;
                    println!(
                        "session {}: score {} (best {}{})",
                        self.sessions_finished,
                        summary.score,
                        summary.best_score,
                        if summary.new_high_score { ", new high score" } else { "" }
                    );
                }
                GameEvent::Scored { score } => log::debug!("passed gap, score {score}"),
                GameEvent::Flap | GameEvent::ObstaclesSpawned { .. } | GameEvent::Restarted => {}
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.sessions > 0, "--sessions must be at least 1");

    let tuning = args
        .tuning
        .as_deref()
        .map(Tuning::load)
        .unwrap_or_default();

    log::info!("Flappy Birb (native) starting, seed {:#x}", args.seed);
    let store = JsonFileStore::open(&args.save);
    log::info!("Best score file: {}", store.path().display());
    let mut game = Game::new(args.seed, tuning, store)?;

    let mut elapsed = 0.0;
    while game.sessions_finished < args.sessions && elapsed < args.max_seconds {
        game.update(FRAME_DT);
        elapsed += FRAME_DT;
    }

    if game.sessions_finished < args.sessions {
        log::warn!(
            "Stopped after {elapsed:.0}s with {} of {} sessions finished (score {})",
            game.sessions_finished,
            args.sessions,
            game.state.session.current_score
        );
    }
    println!("{}", game.state.hud().best_text);
    Ok(())
}
