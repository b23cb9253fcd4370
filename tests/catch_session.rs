//! End-to-end catch sessions driven through the public API.

use glam::Vec2;
use playhub::CatchConfig;
use playhub::audio::{AudioCue, AudioError, AudioSink};
use playhub::consts::{CATCH_REWARD, SIM_DT_MS};
use playhub::settings::InputMode;
use playhub::sim::{
    CatchSession, Difficulty, FallingItem, GameEvent, GameState, Intent, ItemCategory,
    SessionPhase, Snapshot, TickInput, tick,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Fast-paced setup: 800 ms base interval, speed 4, 70% good items
fn quick_config() -> CatchConfig {
    CatchConfig {
        base_spawn_interval: 800.0,
        base_item_speed: 4.0,
        good_item_chance: 0.7,
        show_difficulty: true,
        ..CatchConfig::astro_catch()
    }
}

/// Place an item so the next tick lands it squarely on the player
fn drop_on_player(state: &mut GameState, category: ItemCategory) -> u32 {
    let id = state.next_entity_id();
    let pos = Vec2::new(
        state.player.pos.x + 15.0,
        state.player.pos.y - state.rates.fall_speed + 5.0,
    );
    state.items.push(FallingItem {
        id,
        pos,
        category,
        size: 30.0,
    });
    id
}

#[derive(Default)]
struct CueLog(Vec<AudioCue>);

impl AudioSink for CueLog {
    fn play(&mut self, cue: AudioCue) -> Result<(), AudioError> {
        self.0.push(cue);
        Ok(())
    }
}

#[test]
fn test_forced_catches_then_crash() {
    let config = quick_config();
    let mut state = GameState::new(&config, Difficulty::new(50));
    state.resize(800.0, 600.0);
    assert!(state.start(&config));
    let mut rng = Pcg32::seed_from_u64(2024);
    let idle = TickInput { intent: Intent::None };

    for _ in 0..5 {
        let id = drop_on_player(&mut state, ItemCategory::Good);
        let events = tick(&mut state, &config, &idle, &mut rng);
        assert!(events.contains(&GameEvent::Caught { id }));
    }
    assert_eq!(state.score, 5 * CATCH_REWARD);
    assert_eq!(state.score, 50);

    let id = drop_on_player(&mut state, ItemCategory::Bad);
    let events = tick(&mut state, &config, &idle, &mut rng);
    assert!(events.contains(&GameEvent::Crashed { id }));
    assert_eq!(state.phase, SessionPhase::Ended);

    // Frozen: further ticks change nothing
    let ticks = state.time_ticks;
    for _ in 0..30 {
        assert!(tick(&mut state, &config, &idle, &mut rng).is_empty());
    }
    assert_eq!(state.score, 50);
    assert_eq!(state.time_ticks, ticks);
}

#[test]
fn test_reset_twice_from_idle_is_identical() {
    let config = quick_config();
    let mut state = GameState::new(&config, Difficulty::new(50));
    state.resize(800.0, 600.0);

    state.reset();
    let once = serde_json::to_string(&state).unwrap();
    state.reset();
    let twice = serde_json::to_string(&state).unwrap();

    assert_eq!(once, twice);
    assert_eq!(state.score, 0);
    assert!(state.items.is_empty());
    assert_eq!(state.player.center_x(), 400.0);
    assert_eq!(state.player.rect().bottom(), 580.0);
}

#[test]
fn test_autopilot_session_plays_until_crash() {
    let mut session = CatchSession::new(quick_config(), Difficulty::new(50), InputMode::Autopilot, 11);
    session.resize(800.0, 600.0);

    let mut cues = CueLog::default();
    let mut last_score = 0;
    let mut presenter = |snapshot: &Snapshot| {
        assert!(snapshot.score >= last_score);
        assert!(snapshot.player.within(800.0, 600.0));
        last_score = snapshot.score;
    };

    let mut now = 0.0;
    let mut ticket = session.start(now, &mut cues);
    while let Some(t) = ticket {
        now += SIM_DT_MS;
        ticket = session.frame(t, now, &mut presenter, &mut cues);
        if now > 600_000.0 {
            break;
        }
    }

    assert_eq!(session.phase(), SessionPhase::Ended);
    assert!(!session.is_scheduled());
    assert_eq!(cues.0.first(), Some(&AudioCue::Start));
    assert_eq!(cues.0.last(), Some(&AudioCue::GameOver));
    let catches = cues.0.iter().filter(|c| **c == AudioCue::Catch).count() as u64;
    assert_eq!(session.score(), catches * CATCH_REWARD);
}

#[test]
fn test_restart_after_game_over() {
    let mut session = CatchSession::new(quick_config(), Difficulty::new(50), InputMode::Keyboard, 3);
    session.resize(800.0, 600.0);
    let mut cues = CueLog::default();
    let mut presenter = |_: &Snapshot| {};

    // Stand still until something bad lands
    let mut now = 0.0;
    let mut ticket = session.start(now, &mut cues);
    while let Some(t) = ticket {
        now += SIM_DT_MS;
        ticket = session.frame(t, now, &mut presenter, &mut cues);
        if now > 600_000.0 {
            break;
        }
    }
    assert_eq!(session.phase(), SessionPhase::Ended);

    assert!(session.start(now, &mut cues).is_some());
    assert_eq!(session.phase(), SessionPhase::Running);
    assert_eq!(session.score(), 0);
    assert!(session.state().items.is_empty());
}
