use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `direction`, without any edge handling.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn wrapped(self, grid_size: i32) -> Self {
        Self::new(self.x.rem_euclid(grid_size), self.y.rem_euclid(grid_size))
    }

    pub fn is_within(self, grid_size: i32) -> bool {
        (0..grid_size).contains(&self.x) && (0..grid_size).contains(&self.y)
    }

    pub fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// A turn is valid unless it reverses straight back into the neck.
    pub fn is_valid_change(self, next: Direction) -> bool {
        next != self.opposite()
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    PassThrough,
    Walls,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::PassThrough, GameMode::Walls];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::PassThrough => "pass-through",
            GameMode::Walls => "walls",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass-through" => Ok(GameMode::PassThrough),
            "walls" => Ok(GameMode::Walls),
            other => Err(format!("Unknown game mode: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEndReason {
    WallCollision,
    SelfCollision,
    NoSpaceForFood,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::WallCollision => write!(f, "hit a wall"),
            GameEndReason::SelfCollision => write!(f, "bit its own tail"),
            GameEndReason::NoSpaceForFood => write!(f, "filled the board"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_valid_direction_changes() {
        assert!(!Direction::Up.is_valid_change(Direction::Down));
        assert!(!Direction::Down.is_valid_change(Direction::Up));
        assert!(!Direction::Left.is_valid_change(Direction::Right));
        assert!(!Direction::Right.is_valid_change(Direction::Left));

        assert!(Direction::Up.is_valid_change(Direction::Left));
        assert!(Direction::Up.is_valid_change(Direction::Right));
        assert!(Direction::Up.is_valid_change(Direction::Up));
        assert!(Direction::Left.is_valid_change(Direction::Down));
    }

    #[test]
    fn test_wrapped_handles_both_edges() {
        assert_eq!(Point::new(20, 5).wrapped(20), Point::new(0, 5));
        assert_eq!(Point::new(-1, 5).wrapped(20), Point::new(19, 5));
        assert_eq!(Point::new(3, -1).wrapped(20), Point::new(3, 19));
        assert_eq!(Point::new(3, 20).wrapped(20), Point::new(3, 0));
    }

    #[test]
    fn test_game_mode_parse_and_display() {
        for mode in GameMode::ALL {
            assert_eq!(mode.to_string().parse::<GameMode>(), Ok(mode));
        }
        assert!("portal".parse::<GameMode>().is_err());
    }
}
