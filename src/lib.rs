//! Playhub - casual browser games
//!
//! Core modules:
//! - `sim`: Deterministic catch-arcade simulation (entities, collisions, autopilot)
//! - `tictactoe`: Rules engine and fallible minimax opponent
//! - `schedule`: Owned, cancellable tick/timeout handles
//! - `config`: Data-driven game setup (sizes, speeds, spawn weights)
//! - `catalog`: The game list the hub offers
//! - `audio`: Cue hooks for the presentation layer

pub mod audio;
pub mod catalog;
pub mod config;
pub mod schedule;
pub mod settings;
pub mod sim;
pub mod tictactoe;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{GameKind, Hub};
pub use config::{CatchConfig, ConfigError};
pub use settings::{InputMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh the per-tick speeds are expressed against
    pub const TICKS_PER_SECOND: f64 = 60.0;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / TICKS_PER_SECOND;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Points awarded per good item caught
    pub const CATCH_REWARD: u64 = 10;
    /// Gap between the player's bottom edge and the playfield bottom
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Difficulty bounds (inclusive)
    pub const DIFFICULTY_MIN: u8 = 1;
    pub const DIFFICULTY_MAX: u8 = 100;
    pub const DIFFICULTY_DEFAULT: u8 = 50;

    /// Autopilot: vertical reach of the danger window (pixels)
    pub const DANGER_WINDOW: f32 = 200.0;
    /// Autopilot: horizontal threat / dodge distance as a multiple of player size
    pub const DODGE_FACTOR: f32 = 1.5;

    /// Delay before the computer answers a tic-tac-toe move
    pub const COMPUTER_MOVE_DELAY_MS: f64 = 500.0;
}
