use std::fmt;
use std::time::Duration;

use crate::games::SessionRng;
use super::entity::Snake;
use super::food::{FoodPlacementError, generate_food};
use super::types::{Direction, GameEndReason, GameMode, GameStatus, Point};

pub const DEFAULT_GRID_SIZE: i32 = 20;
/// Smallest board whose centred starting snake lies fully inside it.
pub const MIN_GRID_SIZE: i32 = 4;
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const SCORE_PER_FOOD: u32 = 10;

/// Tick intervals in milliseconds.
pub const INITIAL_SPEED: u64 = 150;
pub const SPEED_INCREMENT: u64 = 5;
pub const MIN_SPEED: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSetupError {
    GridTooSmall { grid_size: i32, min: i32 },
    Food(FoodPlacementError),
}

impl fmt::Display for GameSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameSetupError::GridTooSmall { grid_size, min } => {
                write!(f, "Grid size {} is too small, minimum is {}", grid_size, min)
            }
            GameSetupError::Food(e) => write!(f, "Failed to place food: {}", e),
        }
    }
}

impl std::error::Error for GameSetupError {}

impl From<FoodPlacementError> for GameSetupError {
    fn from(e: FoodPlacementError) -> Self {
        GameSetupError::Food(e)
    }
}

/// Complete single-player game state.
///
/// Every transition borrows the current value and returns its successor; a call
/// that does not apply in the current status returns an identical copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Point,
    pub direction: Direction,
    pub next_direction: Direction,
    pub score: u32,
    pub mode: GameMode,
    pub status: GameStatus,
    pub grid_size: i32,
    pub speed: u64,
    pub end_reason: Option<GameEndReason>,
}

impl GameState {
    /// Fresh idle game with a three-segment snake centred on the board, heading right.
    pub fn new(mode: GameMode, grid_size: i32, rng: &mut SessionRng) -> Result<Self, GameSetupError> {
        if grid_size < MIN_GRID_SIZE {
            return Err(GameSetupError::GridTooSmall {
                grid_size,
                min: MIN_GRID_SIZE,
            });
        }

        let center = grid_size / 2;
        let snake = Snake::new(Point::new(center, center), Direction::Right, INITIAL_SNAKE_LENGTH);
        let food = generate_food(&snake, grid_size, rng)?;

        Ok(Self {
            snake,
            food,
            direction: Direction::Right,
            next_direction: Direction::Right,
            score: 0,
            mode,
            status: GameStatus::Idle,
            grid_size,
            speed: INITIAL_SPEED,
            end_reason: None,
        })
    }

    /// Discards everything and builds a new idle game.
    pub fn reset(mode: GameMode, grid_size: i32, rng: &mut SessionRng) -> Result<Self, GameSetupError> {
        Self::new(mode, grid_size, rng)
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed)
    }

    /// Where the head lands moving one cell along `direction`, after the edge policy.
    /// `None` means the move leaves a walled board.
    pub fn next_head(&self, direction: Direction) -> Option<Point> {
        let candidate = self.snake.head().step(direction);
        match self.mode {
            GameMode::PassThrough => Some(candidate.wrapped(self.grid_size)),
            GameMode::Walls => candidate.is_within(self.grid_size).then_some(candidate),
        }
    }

    /// Queues a turn for the next tick. Reversals and turns outside play are ignored.
    pub fn set_direction(&self, direction: Direction) -> Self {
        if !self.is_playing() || !self.direction.is_valid_change(direction) {
            return self.clone();
        }
        Self {
            next_direction: direction,
            ..self.clone()
        }
    }

    /// Advances the game by one tick.
    pub fn move_snake(&self, rng: &mut SessionRng) -> Self {
        if !self.is_playing() {
            return self.clone();
        }

        let Some(new_head) = self.next_head(self.next_direction) else {
            return self.ended(GameEndReason::WallCollision);
        };

        if self.snake.collides_after_tail_moves(&new_head) {
            return self.ended(GameEndReason::SelfCollision);
        }

        let ate_food = new_head == self.food;

        let mut next = self.clone();
        next.snake.advance(new_head, ate_food);
        next.direction = self.next_direction;

        if ate_food {
            next.score += SCORE_PER_FOOD;
            next.speed = self.speed.saturating_sub(SPEED_INCREMENT).max(MIN_SPEED);
            match generate_food(&next.snake, self.grid_size, rng) {
                Ok(food) => next.food = food,
                Err(FoodPlacementError::NoSpace { .. }) => {
                    next.status = GameStatus::GameOver;
                    next.end_reason = Some(GameEndReason::NoSpaceForFood);
                }
            }
        }

        next
    }

    /// Enters play from any status, including a finished game.
    pub fn start(&self) -> Self {
        Self {
            status: GameStatus::Playing,
            end_reason: None,
            ..self.clone()
        }
    }

    pub fn pause(&self) -> Self {
        if self.status != GameStatus::Playing {
            return self.clone();
        }
        Self {
            status: GameStatus::Paused,
            ..self.clone()
        }
    }

    pub fn resume(&self) -> Self {
        if self.status != GameStatus::Paused {
            return self.clone();
        }
        Self {
            status: GameStatus::Playing,
            ..self.clone()
        }
    }

    /// Same game with the score preset, used to seed spectator playback.
    pub fn with_score(&self, score: u32) -> Self {
        Self {
            score,
            ..self.clone()
        }
    }

    fn ended(&self, reason: GameEndReason) -> Self {
        Self {
            status: GameStatus::GameOver,
            end_reason: Some(reason),
            ..self.clone()
        }
    }
}
