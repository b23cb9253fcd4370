//! Playhub entry point
//!
//! The games are played in the browser through the library's wasm
//! bindings. Natively this runs headless matches and logs how they went.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Playhub (native) starting...");
    log::info!("Browser builds are driven through the wasm bindings; running headless matches");

    for kind in [playhub::GameKind::AstroCatch, playhub::GameKind::HoneyBear] {
        headless::autopilot_run(kind, 800.0, 600.0);
    }
    headless::computer_vs_computer();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start hook, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use playhub::GameKind;
    use playhub::audio::SilentAudio;
    use playhub::consts::SIM_DT_MS;
    use playhub::settings::{InputMode, Settings};
    use playhub::sim::{CatchSession, SessionPhase, Snapshot};
    use playhub::tictactoe::{Board, Mark, Outcome, best_move};

    /// Simulated minutes before an autopilot run is called off
    const RUN_LIMIT_MS: f64 = 5.0 * 60_000.0;

    /// Let the autopilot play one catch session to the end
    pub fn autopilot_run(kind: GameKind, width: f32, height: f32) {
        let Some(config) = kind.catch_config() else {
            return;
        };
        let settings = Settings::default();
        let mut session = CatchSession::new(
            config,
            settings.difficulty,
            InputMode::Autopilot,
            0x5EED_u64 ^ kind as u64,
        );
        session.resize(width, height);

        let mut audio = SilentAudio;
        let mut frames = 0u64;
        let mut presenter = |_: &Snapshot| frames += 1;

        let mut now = 0.0;
        let mut ticket = session.start(now, &mut audio);
        while let Some(t) = ticket {
            now += SIM_DT_MS;
            if now > RUN_LIMIT_MS {
                session.teardown();
                break;
            }
            ticket = session.frame(t, now, &mut presenter, &mut audio);
        }

        let outcome = match session.phase() {
            SessionPhase::Ended => "crashed",
            _ => "still running at the time limit",
        };
        log::info!(
            "{}: autopilot {} after {:.1}s with score {} ({} frames presented)",
            kind.title(),
            outcome,
            now / 1000.0,
            session.score(),
            frames
        );
    }

    /// Two perfect players; the result must be a draw
    pub fn computer_vs_computer() {
        let mut rng = rand::rng();
        let mut board = Board::new();
        let mut to_move = Mark::X;
        let difficulty = playhub::sim::Difficulty::MAX;

        while let Some(index) =
            best_move(&board, to_move, difficulty, to_move.opposite(), to_move, &mut rng)
        {
            board = board.with(index, to_move);
            to_move = to_move.opposite();
        }

        let outcome = match board.winner() {
            Some(mark) => Outcome::Won(mark),
            None => Outcome::Draw,
        };
        log::info!("Tic-tac-toe, computer vs computer:\n{}", board);
        if outcome == Outcome::Draw {
            log::info!("Perfect play ends in a draw");
        } else {
            log::warn!("Perfect play ended in {:?}", outcome);
        }
    }
}
