//! Player preferences
//!
//! Handed over by the page as JSON; anything missing falls back to the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::sim::difficulty::Difficulty;

/// Who steers the catcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Keyboard,
    Autopilot,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Keyboard => "Keyboard",
            InputMode::Autopilot => "Autopilot",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // === Catch games ===
    /// Catch session difficulty (1-100)
    pub difficulty: Difficulty,
    /// Keyboard or autopilot, fixed per session
    pub input_mode: InputMode,

    // === Tic-tac-toe ===
    /// Play against the computer instead of a second local player
    pub vs_computer: bool,
    /// Computer opponent strength (1-100)
    pub computer_difficulty: Difficulty,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            input_mode: InputMode::Keyboard,

            vs_computer: true,
            computer_difficulty: Difficulty::default(),

            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse settings, logging and falling back to defaults on bad input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Volume actually applied (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "difficulty": 80, "inputMode": "autopilot" }"#).unwrap();
        assert_eq!(settings.difficulty.get(), 80);
        assert_eq!(settings.input_mode, InputMode::Autopilot);
        assert!(settings.vs_computer);
        assert_eq!(settings.computer_difficulty.get(), 50);
    }

    #[test]
    fn test_out_of_range_difficulty_is_clamped() {
        let settings = Settings::from_json(r#"{ "difficulty": 0, "computerDifficulty": 999 }"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::MIN);
        assert_eq!(settings.computer_difficulty, Difficulty::MAX);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::from_json_or_default("nope"), Settings::default());
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(Settings::from_json(&settings.to_json()).unwrap(), settings);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_unknown_input_mode_is_rejected() {
        assert!(Settings::from_json(r#"{ "inputMode": "joystick" }"#).is_err());
        let settings = Settings::from_json(r#"{ "inputMode": "keyboard" }"#).unwrap();
        assert_eq!(settings.input_mode, InputMode::Keyboard);
    }

    #[test]
    fn test_effective_volume() {
        let settings = Settings {
            master_volume: 1.7,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 1.0);
        let settings = Settings {
            master_volume: 0.5,
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
