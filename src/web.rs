//! Browser bindings
//!
//! Thin `wasm-bindgen` wrappers that hook the games up to
//! `requestAnimationFrame` and `setTimeout`. The page does all drawing
//! from the JSON handed to its callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::catalog::{ActiveGame, GameKind};
use crate::schedule::Ticket;
use crate::settings::{InputMode, Settings};
use crate::sim::difficulty::Difficulty;
use crate::sim::session::{CatchSession, SnapshotBuffer};
use crate::tictactoe::{Mark, TicTacToeGame};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already installed when the module is re-initialised
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Playhub loaded");
}

/// Titles, taglines and ids for the hub, as JSON
#[wasm_bindgen]
pub fn catalog() -> String {
    #[derive(Serialize)]
    struct Entry {
        id: &'static str,
        title: &'static str,
        tagline: &'static str,
        instructions: &'static str,
    }

    let entries: Vec<Entry> = GameKind::ALL
        .iter()
        .map(|kind| Entry {
            id: kind.id(),
            title: kind.title(),
            tagline: kind.tagline(),
            instructions: kind.instructions(),
        })
        .collect();
    serde_json::to_string(&entries).unwrap_or_default()
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Hand a JSON payload to a page callback.
///
/// Never call this while a driver is borrowed: the page may read back
/// through the getters from inside its callback.
fn notify<T: Serialize>(callback: &Option<js_sys::Function>, payload: &T) {
    match serde_json::to_string(payload) {
        Ok(json) => deliver(callback, &json),
        Err(e) => log::warn!("Failed to encode payload: {}", e),
    }
}

fn deliver(callback: &Option<js_sys::Function>, json: &str) {
    let Some(callback) = callback else {
        return;
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(json)) {
        log::warn!("Page callback failed: {:?}", e);
    }
}

fn audio_for(settings: &Settings) -> AudioManager {
    let mut audio = AudioManager::new();
    audio.set_master_volume(settings.effective_volume());
    audio
}

// === Catch arcade ===

struct CatchDriver {
    session: CatchSession,
    audio: AudioManager,
    on_frame: Option<js_sys::Function>,
    raf_handle: Option<i32>,
}

impl CatchDriver {
    fn cancel_frame(&mut self) {
        if let Some(handle) = self.raf_handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }
}

fn request_frame(driver: Rc<RefCell<CatchDriver>>, ticket: Ticket) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let owner = driver.clone();
    let closure = Closure::once(move |time: f64| {
        frame_loop(driver, ticket, time);
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(handle) => owner.borrow_mut().raf_handle = Some(handle),
        Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
    }
    closure.forget();
}

fn frame_loop(driver: Rc<RefCell<CatchDriver>>, ticket: Ticket, time: f64) {
    let mut buffer = SnapshotBuffer::default();
    let (next, on_frame) = {
        let mut d = driver.borrow_mut();
        d.raf_handle = None;
        let CatchDriver { session, audio, .. } = &mut *d;
        let next = session.frame(ticket, time, &mut buffer, audio);
        (next, d.on_frame.clone())
    };

    for snapshot in &buffer.0 {
        notify(&on_frame, snapshot);
    }
    if let Some(ticket) = next {
        request_frame(driver, ticket);
    }
}

/// One of the catch skins, driven by the browser's frame clock
#[wasm_bindgen]
pub struct WebCatch {
    inner: Rc<RefCell<CatchDriver>>,
}

#[wasm_bindgen]
impl WebCatch {
    /// `game` is a catalog id (`astro-catch`, `honey-bear`)
    #[wasm_bindgen(constructor)]
    pub fn new(game: &str, settings_json: &str) -> Result<WebCatch, JsValue> {
        let settings = Settings::from_json_or_default(settings_json);
        let kind = GameKind::from_id(game)
            .ok_or_else(|| JsValue::from_str(&format!("unknown game: {}", game)))?;
        let ActiveGame::Catch(session) = ActiveGame::build(kind, &settings, now_ms(), seed()) else {
            return Err(JsValue::from_str(&format!("{} is not a catch game", game)));
        };

        Ok(WebCatch {
            inner: Rc::new(RefCell::new(CatchDriver {
                session,
                audio: audio_for(&settings),
                on_frame: None,
                raf_handle: None,
            })),
        })
    }

    /// Callback receiving a JSON snapshot after every tick
    pub fn on_frame(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_frame = Some(callback);
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.inner.borrow_mut().session.resize(width, height);
    }

    pub fn set_difficulty(&self, difficulty: i32) -> bool {
        self.inner
            .borrow_mut()
            .session
            .set_difficulty(Difficulty::new(difficulty as i64))
    }

    pub fn set_autopilot(&self, enabled: bool) -> bool {
        let mode = if enabled {
            InputMode::Autopilot
        } else {
            InputMode::Keyboard
        };
        self.inner.borrow_mut().session.set_input_mode(mode)
    }

    pub fn key_down(&self, key: &str) -> bool {
        self.inner.borrow_mut().session.key_down(key)
    }

    pub fn key_up(&self, key: &str) -> bool {
        self.inner.borrow_mut().session.key_up(key)
    }

    /// Begin a session; false if one is already running
    pub fn start(&self) -> bool {
        let ticket = {
            let mut d = self.inner.borrow_mut();
            let CatchDriver { session, audio, .. } = &mut *d;
            session.start(now_ms(), audio)
        };
        match ticket {
            Some(ticket) => {
                request_frame(self.inner.clone(), ticket);
                true
            }
            None => false,
        }
    }

    pub fn reset(&self) {
        let (snapshot, on_frame) = {
            let mut d = self.inner.borrow_mut();
            d.cancel_frame();
            d.session.reset();
            (d.session.snapshot(), d.on_frame.clone())
        };
        notify(&on_frame, &snapshot);
    }

    pub fn score(&self) -> f64 {
        self.inner.borrow().session.score() as f64
    }

    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.inner.borrow().session.snapshot()).unwrap_or_default()
    }

    /// Stop for good; pending frames become no-ops
    pub fn destroy(&self) {
        let mut d = self.inner.borrow_mut();
        d.cancel_frame();
        d.session.teardown();
    }
}

// === Tic-tac-toe ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardView<'a> {
    cells: &'a [Option<Mark>; 9],
    to_move: Mark,
    status: String,
}

impl<'a> BoardView<'a> {
    fn of(game: &'a TicTacToeGame) -> Self {
        Self {
            cells: game.board().cells(),
            to_move: game.to_move(),
            status: game.status_message(),
        }
    }
}

struct TicTacToeDriver {
    game: TicTacToeGame,
    on_change: Option<js_sys::Function>,
    timeout_handle: Option<i32>,
}

impl TicTacToeDriver {
    fn clear_timeout(&mut self) {
        if let Some(handle) = self.timeout_handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    /// Callback and board JSON, to deliver once the borrow is released
    fn update(&self) -> (Option<js_sys::Function>, String) {
        let json = serde_json::to_string(&BoardView::of(&self.game)).unwrap_or_default();
        (self.on_change.clone(), json)
    }
}

/// Schedule the host timeout for a pending computer move, if any
fn arm_computer(driver: &Rc<RefCell<TicTacToeDriver>>) {
    let Some((ticket, due)) = driver.borrow().game.pending_computer_move() else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };

    let inner = driver.clone();
    let closure = Closure::once(move || computer_timeout(inner, ticket, due));
    let delay = (due - now_ms()).max(0.0).ceil() as i32;
    match window
        .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), delay)
    {
        Ok(handle) => driver.borrow_mut().timeout_handle = Some(handle),
        Err(e) => log::warn!("setTimeout failed: {:?}", e),
    }
    closure.forget();
}

fn computer_timeout(driver: Rc<RefCell<TicTacToeDriver>>, ticket: Ticket, due: f64) {
    let update = {
        let mut d = driver.borrow_mut();
        d.timeout_handle = None;
        // Timers may fire slightly before the due time
        d.game
            .computer_turn(ticket, now_ms().max(due))
            .map(|_| d.update())
    };
    if let Some((on_change, json)) = update {
        deliver(&on_change, &json);
    }
}

/// A tic-tac-toe board
#[wasm_bindgen]
pub struct WebTicTacToe {
    inner: Rc<RefCell<TicTacToeDriver>>,
}

#[wasm_bindgen]
impl WebTicTacToe {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WebTicTacToe, JsValue> {
        let settings = Settings::from_json_or_default(settings_json);
        let ActiveGame::TicTacToe(game) =
            ActiveGame::build(GameKind::TicTacToe, &settings, now_ms(), seed())
        else {
            return Err(JsValue::from_str("tic-tac-toe failed to build"));
        };

        let web = WebTicTacToe {
            inner: Rc::new(RefCell::new(TicTacToeDriver {
                game,
                on_change: None,
                timeout_handle: None,
            })),
        };
        arm_computer(&web.inner);
        Ok(web)
    }

    /// Callback receiving the board as JSON after every move
    pub fn on_change(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }

    /// Cell click. Errors carry the rejection reason.
    pub fn play(&self, index: usize) -> Result<(), JsValue> {
        let (on_change, json) = {
            let mut d = self.inner.borrow_mut();
            d.game
                .play(index, now_ms())
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            d.update()
        };
        arm_computer(&self.inner);
        deliver(&on_change, &json);
        Ok(())
    }

    pub fn reset(&self) {
        let (on_change, json) = {
            let mut d = self.inner.borrow_mut();
            d.clear_timeout();
            d.game.reset(now_ms());
            d.update()
        };
        arm_computer(&self.inner);
        deliver(&on_change, &json);
    }

    pub fn board(&self) -> String {
        serde_json::to_string(&BoardView::of(&self.inner.borrow().game)).unwrap_or_default()
    }

    pub fn status(&self) -> String {
        self.inner.borrow().game.status_message()
    }

    /// Cancel any pending computer move
    pub fn destroy(&self) {
        let mut d = self.inner.borrow_mut();
        d.clear_timeout();
        d.game.teardown();
    }
}
