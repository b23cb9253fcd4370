//! Deterministic catch simulation
//!
//! All arcade gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, threaded in explicitly
//! - Stable iteration order (item creation order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use difficulty::{Difficulty, Rates, derive_rates};
pub use session::{
    CatchSession, InputSource, ItemView, KeyState, Presenter, Snapshot, SnapshotBuffer,
};
pub use state::{
    FallingItem, GameEvent, GameState, ItemCategory, Player, Playfield, RngState, SessionPhase,
};
pub use tick::{Intent, TickInput, tick};
