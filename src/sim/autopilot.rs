//! Heuristic autopilot for the catch game
//!
//! Reads the current entities and returns one steering intent per tick.
//! Lower difficulty means more random fumbling; otherwise it dodges the
//! first nearby threat it sees, or chases the most reachable good item.

use rand::Rng;

use super::difficulty::Difficulty;
use super::state::{FallingItem, GameState, ItemCategory};
use super::tick::Intent;
use crate::consts::{DANGER_WINDOW, DODGE_FACTOR};

/// Pick a steering intent for this tick. Never mutates `state`.
pub fn decide<R: Rng + ?Sized>(state: &GameState, difficulty: Difficulty, rng: &mut R) -> Intent {
    let mistake_chance = 1.0 - difficulty.fraction();
    if rng.random::<f64>() < mistake_chance {
        return Intent::ALL[rng.random_range(0..Intent::ALL.len())];
    }

    let target_x = dodge_target(state).or_else(|| chase_target(state));

    match target_x {
        Some(x) => steer_toward(state, x),
        None => Intent::None,
    }
}

/// Where to move to get clear of the first bad item inside the danger window
fn dodge_target(state: &GameState) -> Option<f32> {
    let player = &state.player;
    let center = player.center_x();
    let reach = player.size * DODGE_FACTOR;

    let threat = state
        .items
        .iter()
        .filter(|item| item.category == ItemCategory::Bad)
        .find(|item| {
            let above_by = player.pos.y - item.pos.y;
            let still_falling_at_us = item.pos.y < player.pos.y + player.size;
            still_falling_at_us
                && above_by < DANGER_WINDOW
                && (item.center_x() - center).abs() < reach
        })?;

    let dx = threat.center_x() - center;
    let away = if dx > 0.0 {
        -1.0
    } else if dx < 0.0 {
        1.0
    } else if center > state.playfield.width / 2.0 {
        // Dead center over us: head for the roomier side
        -1.0
    } else {
        1.0
    };

    // A dodge into the wall is no dodge; go the other way instead
    let min_center = player.size / 2.0;
    let max_center = state.playfield.width - player.size / 2.0;
    let target = center + away * reach;
    if (min_center..=max_center).contains(&target) {
        Some(target)
    } else {
        Some((center - away * reach).clamp(min_center, max_center.max(min_center)))
    }
}

/// Center x of the good item worth chasing, if the path to it is clear
fn chase_target(state: &GameState) -> Option<f32> {
    let player = &state.player;
    let center = player.center_x();
    let height = state.playfield.height;

    let target = state
        .items
        .iter()
        .filter(|item| item.category == ItemCategory::Good)
        .min_by(|a, b| {
            chase_cost(a, center, height)
                .partial_cmp(&chase_cost(b, center, height))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let (lo_x, hi_x) = ordered(center, target.center_x());
    let (lo_y, hi_y) = ordered(target.pos.y, player.pos.y);
    let blocked = state.items.iter().any(|item| {
        item.category == ItemCategory::Bad
            && (lo_x..=hi_x).contains(&item.center_x())
            && (lo_y..=hi_y).contains(&item.pos.y)
    });

    if blocked { None } else { Some(target.center_x()) }
}

/// Closer horizontally and lower down is cheaper
fn chase_cost(item: &FallingItem, player_center: f32, field_height: f32) -> f32 {
    (item.center_x() - player_center).abs() + (field_height - item.pos.y)
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}

fn steer_toward(state: &GameState, target_x: f32) -> Intent {
    let delta = target_x - state.player.center_x();
    let speed = state.player.speed;
    if delta > speed {
        Intent::Right
    } else if delta < -speed {
        Intent::Left
    } else {
        Intent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatchConfig;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state_with(items: &[(ItemCategory, f32, f32)]) -> GameState {
        let config = CatchConfig::astro_catch();
        let mut state = GameState::new(&config, Difficulty::MAX);
        state.resize(800.0, 600.0);
        state.start(&config);
        // Player spans x 370..430, center 400, top at y 520
        for &(category, x, y) in items {
            let id = state.next_entity_id();
            state.items.push(FallingItem {
                id,
                pos: Vec2::new(x, y),
                category,
                size: 30.0,
            });
        }
        state
    }

    fn perfect(state: &GameState) -> Intent {
        let mut rng = Pcg32::seed_from_u64(0);
        decide(state, Difficulty::MAX, &mut rng)
    }

    #[test]
    fn test_idle_without_items() {
        assert_eq!(perfect(&state_with(&[])), Intent::None);
    }

    #[test]
    fn test_dodges_threat_on_the_right() {
        // Bad item center at 420, just right of the player center
        let state = state_with(&[(ItemCategory::Bad, 405.0, 400.0)]);
        assert_eq!(perfect(&state), Intent::Left);
    }

    #[test]
    fn test_dodges_threat_on_the_left() {
        let state = state_with(&[(ItemCategory::Bad, 365.0, 400.0)]);
        assert_eq!(perfect(&state), Intent::Right);
    }

    #[test]
    fn test_ignores_far_threats() {
        // Too high above the player
        let state = state_with(&[(ItemCategory::Bad, 385.0, 100.0)]);
        assert_eq!(perfect(&state), Intent::None);
        // Too far to the side
        let state = state_with(&[(ItemCategory::Bad, 600.0, 450.0)]);
        assert_eq!(perfect(&state), Intent::None);
    }

    #[test]
    fn test_wall_dodge_goes_the_other_way() {
        let mut state = state_with(&[(ItemCategory::Bad, 0.0, 450.0)]);
        state.player.pos.x = 0.0;
        // Threat center 15, player center 30: away would be right anyway
        assert_eq!(perfect(&state), Intent::Right);

        let mut state = state_with(&[(ItemCategory::Bad, 20.0, 450.0)]);
        state.player.pos.x = 0.0;
        // Threat center 35 is right of the player, left is the wall
        assert_eq!(perfect(&state), Intent::Right);
    }

    #[test]
    fn test_chases_good_item() {
        let state = state_with(&[(ItemCategory::Good, 585.0, 300.0)]);
        assert_eq!(perfect(&state), Intent::Right);
        let state = state_with(&[(ItemCategory::Good, 85.0, 300.0)]);
        assert_eq!(perfect(&state), Intent::Left);
    }

    #[test]
    fn test_prefers_lower_closer_item() {
        let state = state_with(&[
            (ItemCategory::Good, 85.0, 50.0),
            (ItemCategory::Good, 585.0, 400.0),
        ]);
        assert_eq!(perfect(&state), Intent::Right);
    }

    #[test]
    fn test_abandons_blocked_chase() {
        // Bad item sits between the player and the target, outside the danger window
        let state = state_with(&[
            (ItemCategory::Good, 685.0, 200.0),
            (ItemCategory::Bad, 535.0, 250.0),
        ]);
        assert_eq!(perfect(&state), Intent::None);
    }

    #[test]
    fn test_close_enough_holds_still() {
        let state = state_with(&[(ItemCategory::Good, 390.0, 300.0)]);
        assert_eq!(perfect(&state), Intent::None);
    }

    #[test]
    fn test_lowest_difficulty_is_mostly_random() {
        let state = state_with(&[(ItemCategory::Good, 585.0, 300.0)]);
        let mut rng = Pcg32::seed_from_u64(11);
        let decisions: Vec<Intent> = (0..300)
            .map(|_| decide(&state, Difficulty::MIN, &mut rng))
            .collect();
        assert!(decisions.contains(&Intent::Left));
        assert!(decisions.contains(&Intent::None));
    }

    proptest! {
        #[test]
        fn prop_decide_is_pure_and_replayable(
            seed in any::<u64>(),
            difficulty in 1i64..=100,
            xs in proptest::collection::vec((0.0f32..770.0, -30.0f32..600.0, any::<bool>()), 0..12),
        ) {
            let items: Vec<_> = xs
                .into_iter()
                .map(|(x, y, good)| {
                    let category = if good { ItemCategory::Good } else { ItemCategory::Bad };
                    (category, x, y)
                })
                .collect();
            let state = state_with(&items);
            let before = format!("{:?}", state);

            let a = decide(&state, Difficulty::new(difficulty), &mut Pcg32::seed_from_u64(seed));
            let b = decide(&state, Difficulty::new(difficulty), &mut Pcg32::seed_from_u64(seed));

            prop_assert_eq!(a, b);
            prop_assert_eq!(before, format!("{:?}", state));
        }
    }
}
