//! Catch game state and core simulation types
//!
//! Everything a tick reads or writes lives here; presentation only ever
//! sees snapshots of it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::{Difficulty, Rates};
use crate::config::CatchConfig;
use crate::consts::PLAYER_BOTTOM_MARGIN;

/// Lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for start; layout follows the playfield
    NotStarted,
    /// Active gameplay
    Running,
    /// A bad item hit the player; last frame stays frozen
    Ended,
}

/// Role a falling item plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Scores when caught
    Good,
    /// Ends the session when caught
    Bad,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, category: ItemCategory },
    Caught { id: u32 },
    /// Collision with a bad item, session over
    Crashed { id: u32 },
    /// Item fell past the bottom edge
    Dropped { id: u32 },
}

/// The player's catcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per tick
    pub speed: f32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }

    /// Keep the player fully inside the playfield
    pub fn clamp_to(&mut self, field: &Playfield) {
        self.pos.x = self.pos.x.min(field.width - self.size).max(0.0);
        self.pos.y = self.pos.y.min(field.height - self.size).max(0.0);
    }
}

/// A falling item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub pos: Vec2,
    pub category: ItemCategory,
    pub size: f32,
}

impl FallingItem {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }
}

/// Playfield bounds in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// False until the host has reported a real layout
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete catch session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: SessionPhase,
    pub playfield: Playfield,
    pub player: Player,
    /// Live items in creation order
    pub items: Vec<FallingItem>,
    pub score: u64,
    /// Fixed for the duration of a session
    pub difficulty: Difficulty,
    /// Pacing derived at session start
    pub rates: Rates,
    /// Simulated time since session start (ms)
    pub clock_ms: f64,
    /// Simulated time of the last spawn (ms)
    pub last_spawn_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    pub fn new(config: &CatchConfig, difficulty: Difficulty) -> Self {
        let difficulty = config.session_difficulty(difficulty);
        Self {
            phase: SessionPhase::NotStarted,
            playfield: Playfield::default(),
            player: Player {
                pos: Vec2::ZERO,
                size: config.player.size,
                speed: config.player.speed,
            },
            items: Vec::new(),
            score: 0,
            difficulty,
            rates: config.rates(difficulty),
            clock_ms: 0.0,
            last_spawn_ms: 0.0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Player position at session start: centered, resting above the bottom edge
    fn layout_player(&mut self) {
        let Playfield { width, height } = self.playfield;
        let size = self.player.size;
        self.player.pos = Vec2::new(
            width / 2.0 - size / 2.0,
            height - size - PLAYER_BOTTOM_MARGIN,
        );
        if self.playfield.is_measured() {
            self.player.clamp_to(&self.playfield);
        }
    }

    /// Back to `NotStarted` with a clean board
    pub fn reset(&mut self) {
        self.phase = SessionPhase::NotStarted;
        self.score = 0;
        self.items.clear();
        self.clock_ms = 0.0;
        self.last_spawn_ms = 0.0;
        self.time_ticks = 0;
        self.layout_player();
    }

    /// Begin a session. Always passes through `reset`, so an ended
    /// session restarts from scratch. Returns false if already running.
    pub fn start(&mut self, config: &CatchConfig) -> bool {
        if self.phase == SessionPhase::Running {
            return false;
        }
        self.reset();
        self.difficulty = config.session_difficulty(self.difficulty);
        self.rates = config.rates(self.difficulty);
        self.phase = SessionPhase::Running;
        self.last_spawn_ms = self.clock_ms;
        true
    }

    /// Change difficulty between sessions. Ignored while running.
    pub fn set_difficulty(&mut self, config: &CatchConfig, difficulty: Difficulty) -> bool {
        if self.phase == SessionPhase::Running {
            return false;
        }
        self.difficulty = config.session_difficulty(difficulty);
        self.rates = config.rates(self.difficulty);
        true
    }

    /// New playfield measurement. Only a session that has not started
    /// re-lays out; a running session keeps absolute coordinates.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        if self.phase == SessionPhase::NotStarted {
            self.layout_player();
        }
    }
}
