//! Fixed-interval simulation tick
//!
//! Advances the board by exactly one grid step.

use super::state::{Color, GameState, GridPosition};

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Obstacle,
    Body,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Board is already over, nothing happened
    Idle,
    /// Snake moved one cell
    Moved,
    /// Snake moved onto the food and grew
    Ate {
        points: u32,
        color: Color,
        speed_changed: bool,
    },
    /// Fatal move; the body was left as it was before the move
    Collided { at: GridPosition, kind: Collision },
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.game_over {
        return TickOutcome::Idle;
    }

    state.time_ticks += 1;

    // Toroidal board: walls wrap instead of killing
    let next = state.wrap(state.head() + state.direction.delta());

    let collision = if state.is_obstacle(next) {
        Some(Collision::Obstacle)
    } else if state.occupies(next) {
        Some(Collision::Body)
    } else {
        None
    };
    if let Some(kind) = collision {
        state.game_over = true;
        return TickOutcome::Collided { at: next, kind };
    }

    state.snake.push_front(next);

    if next != state.food.position {
        state.snake.pop_back();
        return TickOutcome::Moved;
    }

    // Food eaten: keep the tail so the snake grows by one
    let points = state.config.points_per_food;
    let color = state.food.color;
    state.score += points;
    state.snake_color = color;
    state.spawn_food();

    let speed = state.config.tick_interval_ms(state.score);
    let speed_changed = speed != state.speed_ms;
    state.speed_ms = speed;

    log::debug!(
        "Ate {:?} food at {} (score {}, length {})",
        color,
        next,
        state.score,
        state.snake_len()
    );

    TickOutcome::Ate {
        points,
        color,
        speed_changed,
    }
}
