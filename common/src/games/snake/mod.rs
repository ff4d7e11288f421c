mod autopilot;
mod entity;
mod food;
mod game_state;
mod types;

pub use autopilot::{AUTOPILOT_JITTER_PROBABILITY, Autopilot};
pub use entity::Snake;
pub use food::{FoodPlacementError, MAX_FOOD_SAMPLING_ATTEMPTS, generate_food};
pub use game_state::{
    DEFAULT_GRID_SIZE, GameSetupError, GameState, INITIAL_SNAKE_LENGTH, INITIAL_SPEED,
    MIN_GRID_SIZE, MIN_SPEED, SCORE_PER_FOOD, SPEED_INCREMENT,
};
pub use types::{Direction, GameEndReason, GameMode, GameStatus, Point};
