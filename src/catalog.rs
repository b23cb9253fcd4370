//! Game catalog and hub
//!
//! The hub shows the list of games, builds the one the player picks from
//! the current settings, and tears it down again on `back`.

use serde::{Deserialize, Serialize};

use crate::config::CatchConfig;
use crate::settings::Settings;
use crate::sim::session::CatchSession;
use crate::tictactoe::{Mark, Opponent, TicTacToeGame};

/// Games on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    AstroCatch,
    HoneyBear,
    TicTacToe,
}

impl GameKind {
    /// Hub order
    pub const ALL: [GameKind; 3] = [GameKind::AstroCatch, GameKind::HoneyBear, GameKind::TicTacToe];

    pub fn id(&self) -> &'static str {
        match self {
            GameKind::AstroCatch => "astro-catch",
            GameKind::HoneyBear => "honey-bear",
            GameKind::TicTacToe => "tic-tac-toe",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::AstroCatch => "Astro Catch",
            GameKind::HoneyBear => "Honey Bear",
            GameKind::TicTacToe => "Tic Tac Toe",
        }
    }

    /// One-liner on the hub card
    pub fn tagline(&self) -> &'static str {
        match self {
            GameKind::AstroCatch => "Catch stars, avoid asteroids!",
            GameKind::HoneyBear => "Catch honey, avoid bees!",
            GameKind::TicTacToe => "A classic game of X's and O's.",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            GameKind::AstroCatch => "Use arrow keys to catch stars & avoid asteroids!",
            GameKind::HoneyBear => "Use arrow keys to catch honey & avoid bees!",
            GameKind::TicTacToe => "Get three in a row to win!",
        }
    }

    /// Arcade setup for the catch skins
    pub fn catch_config(&self) -> Option<CatchConfig> {
        match self {
            GameKind::AstroCatch => Some(CatchConfig::astro_catch()),
            GameKind::HoneyBear => Some(CatchConfig::honey_bear()),
            GameKind::TicTacToe => None,
        }
    }
}

/// The game currently on screen
pub enum ActiveGame {
    Catch(CatchSession),
    TicTacToe(TicTacToeGame),
}

impl ActiveGame {
    /// Build `kind` from the player's settings
    pub fn build(kind: GameKind, settings: &Settings, now_ms: f64, seed: u64) -> Self {
        match kind.catch_config() {
            Some(config) => ActiveGame::Catch(CatchSession::new(
                config,
                settings.difficulty,
                settings.input_mode,
                seed,
            )),
            None => {
                let opponent = if settings.vs_computer {
                    Opponent::Computer {
                        mark: Mark::O,
                        difficulty: settings.computer_difficulty,
                    }
                } else {
                    Opponent::Human
                };
                ActiveGame::TicTacToe(TicTacToeGame::new(opponent, seed, now_ms))
            }
        }
    }

    /// Cancel every pending tick and timeout
    pub fn teardown(&mut self) {
        match self {
            ActiveGame::Catch(session) => session.teardown(),
            ActiveGame::TicTacToe(game) => game.teardown(),
        }
    }
}

/// Game selection
pub struct Hub {
    settings: Settings,
    active: Option<(GameKind, ActiveGame)>,
}

impl Hub {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            active: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. Takes effect for the next game selected.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn selected(&self) -> Option<GameKind> {
        self.active.as_ref().map(|(kind, _)| *kind)
    }

    pub fn active(&self) -> Option<&ActiveGame> {
        self.active.as_ref().map(|(_, game)| game)
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveGame> {
        self.active.as_mut().map(|(_, game)| game)
    }

    /// Open `kind`, tearing down whatever was running
    pub fn select(&mut self, kind: GameKind, now_ms: f64, seed: u64) -> &mut ActiveGame {
        self.back();
        log::info!("Opening {}", kind.title());
        let game = ActiveGame::build(kind, &self.settings, now_ms, seed);
        &mut self.active.insert((kind, game)).1
    }

    /// Return to the game list
    pub fn back(&mut self) {
        if let Some((kind, mut game)) = self.active.take() {
            game.teardown();
            log::info!("Closed {}", kind.title());
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::settings::InputMode;
    use crate::sim::difficulty::Difficulty;

    #[test]
    fn test_ids_round_trip_in_hub_order() {
        let ids: Vec<_> = GameKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids, ["astro-catch", "honey-bear", "tic-tac-toe"]);
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(GameKind::from_id("pong"), None);
    }

    #[test]
    fn test_catch_skins_share_engine() {
        let astro = GameKind::AstroCatch.catch_config().unwrap();
        let honey = GameKind::HoneyBear.catch_config().unwrap();
        assert_eq!(astro.kind_for(crate::sim::ItemCategory::Good), "star");
        assert_eq!(honey.kind_for(crate::sim::ItemCategory::Good), "honey");
        assert!(GameKind::TicTacToe.catch_config().is_none());
    }

    #[test]
    fn test_select_builds_from_settings() {
        let mut hub = Hub::new(Settings {
            difficulty: Difficulty::new(70),
            input_mode: InputMode::Autopilot,
            ..Settings::default()
        });
        match hub.select(GameKind::AstroCatch, 0.0, 1) {
            ActiveGame::Catch(session) => {
                assert_eq!(session.state().difficulty.get(), 70);
                assert_eq!(session.input().mode(), InputMode::Autopilot);
            }
            ActiveGame::TicTacToe(_) => panic!("expected a catch session"),
        }
        assert_eq!(hub.selected(), Some(GameKind::AstroCatch));
    }

    #[test]
    fn test_tic_tac_toe_opponent_follows_settings() {
        let mut hub = Hub::new(Settings {
            vs_computer: false,
            ..Settings::default()
        });
        match hub.select(GameKind::TicTacToe, 0.0, 1) {
            ActiveGame::TicTacToe(game) => assert_eq!(game.opponent(), Opponent::Human),
            ActiveGame::Catch(_) => panic!("expected tic-tac-toe"),
        }
    }

    #[test]
    fn test_back_tears_down_running_session() {
        let mut hub = Hub::default();
        if let ActiveGame::Catch(session) = hub.select(GameKind::HoneyBear, 0.0, 1) {
            session.resize(800.0, 600.0);
            assert!(session.start(0.0, &mut SilentAudio).is_some());
            assert!(session.is_scheduled());
        }
        hub.back();
        assert!(hub.selected().is_none());
        assert!(hub.active().is_none());
    }

    #[test]
    fn test_teardown_cancels_computer_timer() {
        let mut game = ActiveGame::build(GameKind::TicTacToe, &Settings::default(), 0.0, 1);
        if let ActiveGame::TicTacToe(ttt) = &mut game {
            ttt.play(0, 0.0).unwrap();
            assert!(ttt.pending_computer_move().is_some());
        }
        game.teardown();
        if let ActiveGame::TicTacToe(ttt) = &game {
            assert!(ttt.pending_computer_move().is_none());
        }
    }
}
