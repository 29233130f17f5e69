//! Game state and core simulation types

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::obstacles::generate_obstacles;

/// Grid cell coordinate
pub type GridPosition = IVec2;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit step on the grid (y grows downward)
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }
}

/// Palette shared by the snake and food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    #[default]
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
    Grey,
    Black,
}

impl Color {
    /// Colors food may take (everything but grey and black)
    pub const FOOD_PALETTE: [Color; 8] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
        Color::Pink,
    ];

    /// CSS hex value
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Red => "#ff3b30",
            Color::Orange => "#ff9500",
            Color::Yellow => "#ffcc00",
            Color::Green => "#34c759",
            Color::Cyan => "#32ade6",
            Color::Blue => "#007aff",
            Color::Purple => "#af52de",
            Color::Pink => "#ff2d55",
            Color::Grey => "#8e8e93",
            Color::Black => "#000000",
        }
    }
}

/// The single food item on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: GridPosition,
    pub color: Color,
}

/// Complete board state for one attempt
#[derive(Debug, Clone)]
pub struct GameState {
    /// Board tunables
    pub config: GameConfig,
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Snake body, head first. Never empty.
    pub snake: VecDeque<GridPosition>,
    /// Color of the last food eaten
    pub snake_color: Color,
    pub food: Food,
    /// Fixed for the whole session
    pub obstacles: Vec<GridPosition>,
    pub direction: Direction,
    /// Current tick interval (ms)
    pub speed_ms: u32,
    pub score: u32,
    pub game_over: bool,
    /// Ticks since the attempt started
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new board with the given seed (grid sides below 1 are raised to 1)
    pub fn new(mut config: GameConfig, seed: u64) -> Self {
        config.grid_width = config.grid_width.max(1);
        config.grid_height = config.grid_height.max(1);
        let obstacles = generate_obstacles(config.grid_width, config.grid_height);
        let mut state = Self {
            speed_ms: config.tick_interval_ms(0),
            snake: VecDeque::new(),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            snake_color: Color::default(),
            food: Food {
                position: IVec2::ZERO,
                color: Color::Red,
            },
            obstacles,
            direction: Direction::Right,
            score: 0,
            game_over: false,
            time_ticks: 0,
        };
        state.reset();
        state
    }

    /// Start a fresh attempt: new snake, food, direction and score.
    /// Obstacles and the RNG stream carry over.
    pub fn reset(&mut self) {
        let center = IVec2::new(self.config.grid_width / 2, self.config.grid_height / 2);
        let direction = Direction::Right;
        let tail_step = direction.opposite().delta();
        let length = self.config.initial_snake_length.max(1);

        self.snake = (0..length as i32)
            .map(|i| self.wrap(center + tail_step * i))
            .collect();
        self.snake_color = Color::default();
        self.direction = direction;
        self.score = 0;
        self.speed_ms = self.config.tick_interval_ms(0);
        self.game_over = false;
        self.time_ticks = 0;
        self.spawn_food();
    }

    /// Head of the snake
    pub fn head(&self) -> GridPosition {
        self.snake[0]
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    /// Request a new direction. Reversal onto the body is ignored.
    /// Returns true if the direction was applied.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.direction.is_opposite(requested) {
            return false;
        }
        self.direction = requested;
        true
    }

    /// Wrap a position onto the toroidal grid
    pub fn wrap(&self, pos: GridPosition) -> GridPosition {
        IVec2::new(
            pos.x.rem_euclid(self.config.grid_width),
            pos.y.rem_euclid(self.config.grid_height),
        )
    }

    pub fn is_obstacle(&self, pos: GridPosition) -> bool {
        self.obstacles.contains(&pos)
    }

    /// True if any body segment (tail included) sits on `pos`
    pub fn occupies(&self, pos: GridPosition) -> bool {
        self.snake.contains(&pos)
    }

    /// Manhattan distance on the wrapped grid
    pub fn wrapped_distance(&self, a: GridPosition, b: GridPosition) -> i32 {
        let d = (a - b).abs();
        let dx = d.x.min(self.config.grid_width - d.x);
        let dy = d.y.min(self.config.grid_height - d.y);
        dx + dy
    }

    /// Place food at a random cell with a random palette color.
    ///
    /// The cell is not checked against the snake or obstacles, so food can
    /// land somewhere unreachable until the snake moves off it.
    pub fn spawn_food(&mut self) {
        let x = self.rng.random_range(0..self.config.grid_width);
        let y = self.rng.random_range(0..self.config.grid_height);
        let color = Color::FOOD_PALETTE[self.rng.random_range(0..Color::FOOD_PALETTE.len())];
        self.food = Food {
            position: IVec2::new(x, y),
            color,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(GameConfig::default(), 12345);
        assert_eq!(state.snake_len(), 3);
        assert_eq!(state.head(), IVec2::new(10, 10));
        assert_eq!(state.snake[1], IVec2::new(9, 10));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 12);
        assert!(!state.game_over);
    }

    #[test]
    fn test_set_direction_rejects_reversal() {
        let mut state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.snake_len(), 3);
        assert!(!state.set_direction(Direction::Left));
        assert_eq!(state.direction, Direction::Right);
        assert!(state.set_direction(Direction::Up));
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_wrap() {
        let state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.wrap(IVec2::new(20, 5)), IVec2::new(0, 5));
        assert_eq!(state.wrap(IVec2::new(-1, -1)), IVec2::new(19, 19));
        assert_eq!(state.wrap(IVec2::new(7, 8)), IVec2::new(7, 8));
    }

    #[test]
    fn test_wrapped_distance() {
        let state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.wrapped_distance(IVec2::new(0, 0), IVec2::new(19, 0)), 1);
        assert_eq!(state.wrapped_distance(IVec2::new(2, 3), IVec2::new(5, 7)), 7);
    }

    #[test]
    fn test_food_never_grey_or_black() {
        let mut state = GameState::new(GameConfig::default(), 777);
        for _ in 0..500 {
            state.spawn_food();
            assert!(!matches!(state.food.color, Color::Grey | Color::Black));
            assert!((0..20).contains(&state.food.position.x));
            assert!((0..20).contains(&state.food.position.y));
        }
    }

    #[test]
    fn test_reset_keeps_obstacles() {
        let mut state = GameState::new(GameConfig::new(16, 12), 42);
        let obstacles = state.obstacles.clone();
        state.score = 90;
        state.game_over = true;
        state.snake.push_back(IVec2::new(1, 1));
        state.direction = Direction::Up;

        state.reset();
        assert_eq!(state.obstacles, obstacles);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake_len(), 3);
        assert_eq!(state.direction, Direction::Right);
        assert!(!state.game_over);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(GameConfig::default(), 99999);
        let mut b = GameState::new(GameConfig::default(), 99999);
        for _ in 0..20 {
            a.spawn_food();
            b.spawn_food();
            assert_eq!(a.food, b.food);
        }
    }

    #[test]
    fn test_empty_grid_is_raised() {
        let config = GameConfig {
            grid_width: 0,
            grid_height: 0,
            ..Default::default()
        };
        let mut state = GameState::new(config, 5);
        assert_eq!((state.config.grid_width, state.config.grid_height), (1, 1));
        assert_eq!(state.head(), IVec2::ZERO);
        assert_eq!(state.food.position, IVec2::ZERO);
        state.spawn_food();
        assert_eq!(state.wrap(IVec2::new(-3, 7)), IVec2::ZERO);
    }
}
