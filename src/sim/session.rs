//! Catch session driver
//!
//! Owns everything one playthrough needs: state, config, the active input
//! source, the RNG and the tick schedule. The host calls `frame` from its
//! per-refresh callback; wall-clock time is accumulated and consumed in
//! fixed 60 Hz steps so pacing survives dropped frames.

use rand_pcg::Pcg32;
use serde::Serialize;

use super::autopilot;
use super::collision::Rect;
use super::difficulty::Difficulty;
use super::state::{GameEvent, GameState, ItemCategory, RngState, SessionPhase};
use super::tick::{Intent, TickInput, tick};
use crate::audio::{AudioCue, AudioSink, fire};
use crate::config::CatchConfig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};
use crate::schedule::{Schedule, Ticket};
use crate::settings::InputMode;

/// Longest wall-clock gap a single frame may feed the simulation
const MAX_FRAME_MS: f64 = 100.0;

/// Held direction keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    left: bool,
    right: bool,
}

impl KeyState {
    /// Record a key going down. Returns true if the key steers.
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set(key, true)
    }

    /// Record a key coming up. Returns true if the key steers.
    pub fn key_up(&mut self, key: &str) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: &str, pressed: bool) -> bool {
        match key {
            "ArrowLeft" | "a" => self.left = pressed,
            "ArrowRight" | "d" => self.right = pressed,
            _ => return false,
        }
        true
    }

    /// Both directions held cancel out
    pub fn intent(&self) -> Intent {
        match (self.left, self.right) {
            (true, false) => Intent::Left,
            (false, true) => Intent::Right,
            _ => Intent::None,
        }
    }
}

/// Active steering source for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard(KeyState),
    Autopilot,
}

impl InputSource {
    pub fn from_mode(mode: InputMode) -> Self {
        match mode {
            InputMode::Keyboard => InputSource::Keyboard(KeyState::default()),
            InputMode::Autopilot => InputSource::Autopilot,
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            InputSource::Keyboard(_) => InputMode::Keyboard,
            InputSource::Autopilot => InputMode::Autopilot,
        }
    }
}

/// A falling item as the presentation layer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: u32,
    pub rect: Rect,
    pub category: ItemCategory,
    /// Rendered kind bound to the category
    pub kind: String,
}

/// Read-only picture of the session after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub player: Rect,
    pub items: Vec<ItemView>,
    pub score: u64,
    pub phase: SessionPhase,
}

/// Receives a snapshot after every tick
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> Presenter for F {
    fn present(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Holds snapshots so they can be handed on once the frame has returned
#[derive(Debug, Default)]
pub struct SnapshotBuffer(pub Vec<Snapshot>);

impl Presenter for SnapshotBuffer {
    fn present(&mut self, snapshot: &Snapshot) {
        self.0.push(snapshot.clone());
    }
}

/// One catch game, from start through game over and restarts
pub struct CatchSession {
    config: CatchConfig,
    state: GameState,
    input: InputSource,
    rng: Pcg32,
    schedule: Schedule,
    accumulator: f64,
    last_frame_ms: f64,
}

impl CatchSession {
    pub fn new(config: CatchConfig, difficulty: Difficulty, mode: InputMode, seed: u64) -> Self {
        let state = GameState::new(&config, difficulty);
        Self {
            config,
            state,
            input: InputSource::from_mode(mode),
            rng: RngState::new(seed).to_rng(),
            schedule: Schedule::new(),
            accumulator: 0.0,
            last_frame_ms: 0.0,
        }
    }

    pub fn config(&self) -> &CatchConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn input(&self) -> &InputSource {
        &self.input
    }

    /// Host reported a new playfield size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Change difficulty before a session. Ignored while running.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        self.state.set_difficulty(&self.config, difficulty)
    }

    /// Choose keyboard or autopilot. Ignored while running.
    pub fn set_input_mode(&mut self, mode: InputMode) -> bool {
        if self.state.phase == SessionPhase::Running {
            return false;
        }
        self.input = InputSource::from_mode(mode);
        true
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        match &mut self.input {
            InputSource::Keyboard(keys) => keys.key_down(key),
            InputSource::Autopilot => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match &mut self.input {
            InputSource::Keyboard(keys) => keys.key_up(key),
            InputSource::Autopilot => false,
        }
    }

    /// Start a session. Returns the ticket for the first frame, or `None`
    /// if a session is already running.
    pub fn start(&mut self, now_ms: f64, audio: &mut dyn AudioSink) -> Option<Ticket> {
        if !self.state.start(&self.config) {
            return None;
        }
        if let InputSource::Keyboard(keys) = &mut self.input {
            *keys = KeyState::default();
        }
        self.accumulator = 0.0;
        self.last_frame_ms = now_ms;

        log::info!(
            "Session started: difficulty {}, {} input",
            self.state.difficulty.get(),
            self.input.mode().as_str()
        );
        fire(audio, AudioCue::Start);
        Some(self.schedule.arm())
    }

    /// Run the simulation up to `now_ms`, presenting a snapshot per tick.
    ///
    /// Returns the ticket for the next frame, or `None` when the loop has
    /// stopped (session ended, torn down, or the ticket was stale).
    pub fn frame(
        &mut self,
        ticket: Ticket,
        now_ms: f64,
        presenter: &mut dyn Presenter,
        audio: &mut dyn AudioSink,
    ) -> Option<Ticket> {
        if !self.schedule.take(ticket) {
            log::debug!("Ignoring stale frame callback");
            return None;
        }

        let dt = (now_ms - self.last_frame_ms).clamp(0.0, MAX_FRAME_MS);
        self.last_frame_ms = now_ms;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT_MS;
            substeps += 1;

            let events = self.step();
            self.dispatch(&events, audio);
            presenter.present(&self.snapshot());

            if self.state.phase != SessionPhase::Running {
                break;
            }
        }

        if self.state.phase == SessionPhase::Running {
            Some(self.schedule.arm())
        } else {
            self.accumulator = 0.0;
            None
        }
    }

    /// One fixed tick with input from the active source
    fn step(&mut self) -> Vec<GameEvent> {
        let intent = match &self.input {
            InputSource::Keyboard(keys) => keys.intent(),
            InputSource::Autopilot => {
                autopilot::decide(&self.state, self.state.difficulty, &mut self.rng)
            }
        };
        tick(&mut self.state, &self.config, &TickInput { intent }, &mut self.rng)
    }

    fn dispatch(&self, events: &[GameEvent], audio: &mut dyn AudioSink) {
        for event in events {
            match event {
                GameEvent::Caught { .. } => fire(audio, AudioCue::Catch),
                GameEvent::Crashed { .. } => {
                    log::info!(
                        "Game over: score {} after {} ticks",
                        self.state.score,
                        self.state.time_ticks
                    );
                    fire(audio, AudioCue::GameOver);
                }
                GameEvent::Spawned { .. } | GameEvent::Dropped { .. } => {}
            }
        }
    }

    /// Back to `NotStarted`, halting any scheduled frame
    pub fn reset(&mut self) {
        self.schedule.cancel();
        self.accumulator = 0.0;
        self.state.reset();
    }

    /// Stop the loop for good; late frame callbacks become no-ops
    pub fn teardown(&mut self) {
        self.schedule.cancel();
    }

    /// Whether a frame callback is expected
    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_armed()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.state.player.rect(),
            items: self
                .state
                .items
                .iter()
                .map(|item| ItemView {
                    id: item.id,
                    rect: item.rect(),
                    category: item.category,
                    kind: self.config.kind_for(item.category).to_string(),
                })
                .collect(),
            score: self.state.score,
            phase: self.state.phase,
        }
    }
}
