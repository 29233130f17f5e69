//! Idle/demo mode steering
//!
//! Greedy one-step lookahead: never reverses, never steps onto an obstacle
//! or the body if it can help it, and otherwise heads for the food.

use super::state::{Direction, GameState};

/// Pick the next direction for the snake
pub fn choose_direction(state: &GameState) -> Direction {
    let head = state.head();

    Direction::ALL
        .into_iter()
        .filter(|d| !state.direction.is_opposite(*d))
        .map(|d| (d, state.wrap(head + d.delta())))
        .filter(|(_, cell)| !state.is_obstacle(*cell) && !state.occupies(*cell))
        // Prefer keeping the current heading on ties
        .min_by_key(|(d, cell)| {
            (
                state.wrapped_distance(*cell, state.food.position),
                *d != state.direction,
            )
        })
        .map(|(d, _)| d)
        .unwrap_or(state.direction)
}
