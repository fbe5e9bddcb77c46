//! Headless application loop.
//!
//! Each frame: play due script steps into the input hub, poll the listener,
//! advance the simulation by the frame delta and log what happened.

use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;
use stillwalk_gameplay::{
    FrameSnapshot, GameEvent, GameState, InputHub, InputListener, KeyBindings, LevelSet,
};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::script::{InputScript, ScriptPlayer};
use crate::timing::FrameClock;

/// Counters collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Frames run
    pub frames: u32,
    /// Simulation ticks run
    pub ticks: u64,
    /// Events observed
    pub events: usize,
    /// Successful room transitions
    pub room_changes: u32,
    /// Enemies killed
    pub kills: u32,
    /// Player deaths
    pub deaths: u32,
}

impl RunStats {
    fn record(&mut self, event: &GameEvent) {
        self.events += 1;
        match event {
            GameEvent::RoomChanged { .. } => self.room_changes += 1,
            GameEvent::EnemyKilled { .. } => self.kills += 1,
            GameEvent::PlayerDied => self.deaths += 1,
            _ => {},
        }
    }
}

/// The running application.
#[derive(Debug)]
pub struct App {
    config: EngineConfig,
    state: GameState,
    hub: InputHub,
    listener: InputListener,
    script: ScriptPlayer,
    clock: FrameClock,
    stats: RunStats,
}

impl App {
    /// Loads levels and the input script and builds the game.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let levels = LevelSet::load(&config.level_file)
            .with_context(|| format!("loading levels from {}", config.level_file.display()))?;

        let script = match &config.script_file {
            Some(path) => InputScript::load(path)
                .with_context(|| format!("loading input script {}", path.display()))?,
            None => {
                info!("No input script configured, using the demo track");
                InputScript::demo()
            },
        };

        let state = GameState::new(config.gameplay.clone(), levels)
            .context("starting the game")?;

        let hub = InputHub::new();
        let listener = hub.register(KeyBindings::default());
        let clock = FrameClock::new(config.target_fps, config.realtime);

        Ok(Self {
            config,
            state,
            hub,
            listener,
            script: ScriptPlayer::new(script),
            clock,
            stats: RunStats::default(),
        })
    }

    /// Runs the configured number of frames.
    pub fn run(&mut self) -> RunStats {
        self.clock.reset();
        for frame in 0..self.config.frames {
            self.frame(frame);
            self.clock.sleep_remainder();
        }

        self.stats.ticks = self.state.tick_count();
        info!(
            "Ran {} frames ({} ticks, {:.1} fps)",
            self.stats.frames,
            self.stats.ticks,
            self.clock.current_fps()
        );
        if !self.script.finished() {
            warn!("Run ended before the input script did");
        }
        self.stats.clone()
    }

    fn frame(&mut self, frame: u32) {
        self.script.play(frame, &self.hub);
        let input = self.listener.poll();
        let dt = self.clock.delta_time();

        for event in self.state.update(dt, &input) {
            log_event(&event);
            self.stats.record(&event);
        }
        self.stats.frames += 1;
    }

    /// Current frame view.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        self.state.snapshot()
    }

    /// Writes the final snapshot as JSON to the configured file, or stdout.
    pub fn write_snapshot(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        match &self.config.snapshot_file {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, json)
                    .with_context(|| format!("writing snapshot to {}", path.display()))?;
                info!("Wrote snapshot to {}", path.display());
            },
            None => println!("{json}"),
        }
        Ok(())
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::RoomChanged { from, to } => info!("Room {from} -> {to}"),
        GameEvent::PlayerDied => info!("Player died"),
        GameEvent::GameRestarted => info!("Game restarted"),
        GameEvent::EnemyKilled { key, .. } => info!("Enemy {key} killed"),
        other => debug!("Event: {other:?}"),
    }
}

/// Runs the engine with the given configuration.
pub fn run(config: EngineConfig) -> Result<()> {
    let mut app = App::new(config)?;
    let stats = app.run();
    info!("Run stats: {}", serde_json::to_string(&stats)?);
    app.write_snapshot()
}
