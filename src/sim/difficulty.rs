//! Difficulty scaling
//!
//! A single 1-100 value sets the pacing of a catch session and the
//! strength of both computer players.
//!
//! Scaling: `factor = (difficulty - 1) / 5`, then
//! `interval = base_interval / (1 + factor)` and `speed = base_speed * (1 + factor)`.
//! Difficulty 1 plays at exactly the base pacing.

use serde::{Deserialize, Serialize};

use crate::consts::{DIFFICULTY_DEFAULT, DIFFICULTY_MAX, DIFFICULTY_MIN};

/// Difficulty level, always within `[DIFFICULTY_MIN, DIFFICULTY_MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(DIFFICULTY_MIN);
    pub const MAX: Difficulty = Difficulty(DIFFICULTY_MAX);

    /// Build a difficulty, clamping out-of-range input
    pub fn new(value: i64) -> Self {
        Self(value.clamp(DIFFICULTY_MIN as i64, DIFFICULTY_MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Difficulty as a fraction in (0, 1]
    pub fn fraction(self) -> f64 {
        self.0 as f64 / DIFFICULTY_MAX as f64
    }

    /// Pace multiplier applied to the base rates
    fn pace(self) -> f64 {
        1.0 + (self.0 - DIFFICULTY_MIN) as f64 / 5.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(DIFFICULTY_DEFAULT)
    }
}

impl From<i64> for Difficulty {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

/// Spawn interval and fall speed derived for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Milliseconds between spawns
    pub spawn_interval_ms: f64,
    /// Pixels per tick
    pub fall_speed: f32,
}

/// Derive session pacing from difficulty and the configured base rates
///
/// Non-positive base values are floored to a tiny positive number so the
/// derived rates stay strictly positive.
pub fn derive_rates(difficulty: Difficulty, base_interval_ms: f64, base_speed: f32) -> Rates {
    let pace = difficulty.pace();
    let base_interval_ms = base_interval_ms.max(f64::EPSILON);
    let base_speed = base_speed.max(f32::EPSILON);
    Rates {
        spawn_interval_ms: base_interval_ms / pace,
        fall_speed: base_speed * pace as f32,
    }
}
