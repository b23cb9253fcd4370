//! Fixed timestep simulation tick
//!
//! Core catch loop: steer, clamp, spawn, advance, resolve collisions.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::overlaps;
use super::state::{FallingItem, GameEvent, GameState, ItemCategory, SessionPhase};
use crate::config::CatchConfig;
use crate::consts::{CATCH_REWARD, SIM_DT_MS};

/// Discrete steering intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Intent {
    Left,
    Right,
    #[default]
    None,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::Left, Intent::Right, Intent::None];

    /// Horizontal direction: -1, 0 or +1
    pub fn axis(self) -> f32 {
        match self {
            Intent::Left => -1.0,
            Intent::Right => 1.0,
            Intent::None => 0.0,
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub intent: Intent,
}

/// Advance a running session by one fixed timestep
///
/// Returns what happened this tick, in item-creation order. Does nothing
/// unless the session is running and the playfield has been measured.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &CatchConfig,
    input: &TickInput,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase != SessionPhase::Running {
        return events;
    }
    if !state.playfield.is_measured() {
        log::debug!("Playfield not measured yet, skipping tick");
        return events;
    }

    state.time_ticks += 1;
    state.clock_ms = state.time_ticks as f64 * SIM_DT_MS;

    // Player update
    let field = state.playfield;
    state.player.pos.x += input.intent.axis() * state.player.speed;
    state.player.clamp_to(&field);

    // Spawn check
    if state.clock_ms - state.last_spawn_ms >= state.rates.spawn_interval_ms {
        if let Some(event) = spawn_item(state, config, rng) {
            events.push(event);
        }
    }

    // Advance items and resolve collisions
    let fall_speed = state.rates.fall_speed;
    let player_rect = state.player.rect();
    let mut items = std::mem::take(&mut state.items).into_iter();
    let mut kept = Vec::with_capacity(items.len());

    for mut item in items.by_ref() {
        item.pos.y += fall_speed;

        if overlaps(&player_rect, &item.rect()) {
            match item.category {
                ItemCategory::Good => {
                    state.score += CATCH_REWARD;
                    events.push(GameEvent::Caught { id: item.id });
                }
                ItemCategory::Bad => {
                    state.phase = SessionPhase::Ended;
                    events.push(GameEvent::Crashed { id: item.id });
                    kept.push(item);
                    break;
                }
            }
        } else if item.pos.y < field.height {
            kept.push(item);
        } else {
            events.push(GameEvent::Dropped { id: item.id });
        }
    }

    // Anything after a crash is frozen as-is for the final frame
    kept.extend(items);
    state.items = kept;

    events
}

/// Drop a new item in at the top edge
///
/// Category is a weighted coin flip on `good_item_chance`; x is uniform
/// over the positions that keep the item inside the playfield. A category
/// whose kind has no configured size never spawns, and the spawn timer is
/// left untouched so the next tick tries again.
fn spawn_item<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &CatchConfig,
    rng: &mut R,
) -> Option<GameEvent> {
    let category = if rng.random::<f64>() < config.good_item_chance {
        ItemCategory::Good
    } else {
        ItemCategory::Bad
    };
    let size = config.item_size(category)?;

    let max_x = (state.playfield.width - size).max(0.0);
    let x = rng.random::<f32>() * max_x;
    let id = state.next_entity_id();

    state.items.push(FallingItem {
        id,
        pos: Vec2::new(x, -size),
        category,
        size,
    });
    state.last_spawn_ms = state.clock_ms;

    Some(GameEvent::Spawned { id, category })
}
