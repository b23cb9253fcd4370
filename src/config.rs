//! Data-driven catch game setup
//!
//! A skin is nothing but a `CatchConfig`: entity sizes, speeds, spawn
//! weights and the rendered kinds bound to the good/bad categories. The
//! JSON shape matches the config objects the page hands over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::difficulty::{Difficulty, Rates, derive_rates};
use crate::sim::state::ItemCategory;

/// Errors raised while reading config or settings JSON
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Player entity setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Side length of the (square) player
    pub size: f32,
    /// Pixels moved per tick while steering
    pub speed: f32,
}

/// A falling item kind and its size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub kind: String,
    pub size: f32,
}

/// Which rendered kind plays the good and the bad role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemKinds {
    pub good: String,
    pub bad: String,
}

/// Complete setup for one catch skin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchConfig {
    pub player: PlayerConfig,
    pub items: Vec<ItemConfig>,
    pub item_kinds: ItemKinds,
    /// Spawn interval at difficulty 1 (ms)
    pub base_spawn_interval: f64,
    /// Fall speed at difficulty 1 (px/tick)
    pub base_item_speed: f32,
    /// Probability that a spawned item is good
    pub good_item_chance: f64,
    /// Whether the player may pick a difficulty; when false the session runs at the default
    #[serde(default)]
    pub show_difficulty: bool,
}

impl CatchConfig {
    /// Stars to catch, asteroids to dodge
    pub fn astro_catch() -> Self {
        Self {
            player: PlayerConfig {
                size: 60.0,
                speed: 10.0,
            },
            items: vec![
                ItemConfig {
                    kind: "star".into(),
                    size: 30.0,
                },
                ItemConfig {
                    kind: "asteroid".into(),
                    size: 30.0,
                },
            ],
            item_kinds: ItemKinds {
                good: "star".into(),
                bad: "asteroid".into(),
            },
            base_spawn_interval: 1200.0,
            base_item_speed: 2.0,
            good_item_chance: 0.7,
            show_difficulty: true,
        }
    }

    /// Honey pots to catch, bees to dodge
    pub fn honey_bear() -> Self {
        Self {
            player: PlayerConfig {
                size: 60.0,
                speed: 10.0,
            },
            items: vec![
                ItemConfig {
                    kind: "honey".into(),
                    size: 30.0,
                },
                ItemConfig {
                    kind: "bee".into(),
                    size: 30.0,
                },
            ],
            item_kinds: ItemKinds {
                good: "honey".into(),
                bad: "bee".into(),
            },
            base_spawn_interval: 800.0,
            base_item_speed: 4.0,
            good_item_chance: 0.7,
            show_difficulty: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rendered kind bound to a category
    pub fn kind_for(&self, category: ItemCategory) -> &str {
        match category {
            ItemCategory::Good => &self.item_kinds.good,
            ItemCategory::Bad => &self.item_kinds.bad,
        }
    }

    /// Size of the items in a category, `None` if its kind has no entry
    pub fn item_size(&self, category: ItemCategory) -> Option<f32> {
        let kind = self.kind_for(category);
        self.items.iter().find(|c| c.kind == kind).map(|c| c.size)
    }

    /// Difficulty a session actually runs at
    pub fn session_difficulty(&self, requested: Difficulty) -> Difficulty {
        if self.show_difficulty {
            requested
        } else {
            Difficulty::default()
        }
    }

    /// Pacing for a session at `difficulty`
    pub fn rates(&self, difficulty: Difficulty) -> Rates {
        derive_rates(
            self.session_difficulty(difficulty),
            self.base_spawn_interval,
            self.base_item_speed,
        )
    }
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self::astro_catch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup() {
        let config = CatchConfig::honey_bear();
        assert_eq!(config.kind_for(ItemCategory::Good), "honey");
        assert_eq!(config.kind_for(ItemCategory::Bad), "bee");
        assert_eq!(config.item_size(ItemCategory::Bad), Some(30.0));
    }

    #[test]
    fn test_missing_kind_has_no_size() {
        let mut config = CatchConfig::astro_catch();
        config.items.retain(|c| c.kind != "asteroid");
        assert_eq!(config.item_size(ItemCategory::Bad), None);
        assert_eq!(config.item_size(ItemCategory::Good), Some(30.0));
    }

    #[test]
    fn test_hidden_difficulty_runs_at_default() {
        let config = CatchConfig::honey_bear();
        assert_eq!(config.session_difficulty(Difficulty::new(90)), Difficulty::default());
        let rates = config.rates(Difficulty::new(90));
        // factor (50 - 1) / 5 = 9.8
        assert!((rates.spawn_interval_ms - 800.0 / 10.8).abs() < 1e-9);
        assert!((rates.fall_speed - 4.0 * 10.8).abs() < 1e-4);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "player": { "size": 40, "speed": 8 },
            "items": [ { "kind": "gem", "size": 20 }, { "kind": "bomb", "size": 24 } ],
            "itemKinds": { "good": "gem", "bad": "bomb" },
            "baseSpawnInterval": 900,
            "baseItemSpeed": 3,
            "goodItemChance": 0.5
        }"#;
        let config = CatchConfig::from_json(json).unwrap();
        assert_eq!(config.player.size, 40.0);
        assert_eq!(config.item_size(ItemCategory::Bad), Some(24.0));
        assert!(!config.show_difficulty);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            CatchConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
