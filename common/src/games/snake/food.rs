use std::fmt;

use crate::games::SessionRng;
use super::entity::Snake;
use super::types::Point;

/// Random draws attempted before falling back to scanning the free cells.
pub const MAX_FOOD_SAMPLING_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodPlacementError {
    NoSpace { grid_size: i32, snake_length: usize },
}

impl fmt::Display for FoodPlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodPlacementError::NoSpace { grid_size, snake_length } => write!(
                f,
                "No free cell for food: snake of length {} fills a {}x{} grid",
                snake_length, grid_size, grid_size
            ),
        }
    }
}

impl std::error::Error for FoodPlacementError {}

/// Picks a uniformly random cell of the `grid_size`² board that the snake does not cover.
pub fn generate_food(
    snake: &Snake,
    grid_size: i32,
    rng: &mut SessionRng,
) -> Result<Point, FoodPlacementError> {
    let total_cells = (grid_size.max(0) as usize).pow(2);
    let covered = snake.segments().filter(|p| p.is_within(grid_size)).count();
    if covered >= total_cells {
        return Err(FoodPlacementError::NoSpace {
            grid_size,
            snake_length: snake.len(),
        });
    }

    for _ in 0..MAX_FOOD_SAMPLING_ATTEMPTS {
        let candidate = Point::new(
            rng.random_range(0..grid_size),
            rng.random_range(0..grid_size),
        );
        if !snake.contains(&candidate) {
            return Ok(candidate);
        }
    }

    // Dense board: choose directly among the remaining cells.
    let free: Vec<Point> = (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| Point::new(x, y)))
        .filter(|p| !snake.contains(p))
        .collect();
    Ok(free[rng.random_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::Direction;

    fn full_rows(grid_size: i32, rows: i32) -> Vec<Point> {
        // Boustrophedon so the body stays contiguous.
        let mut cells = Vec::new();
        for y in 0..rows {
            if y % 2 == 0 {
                cells.extend((0..grid_size).map(|x| Point::new(x, y)));
            } else {
                cells.extend((0..grid_size).rev().map(|x| Point::new(x, y)));
            }
        }
        cells
    }

    #[test]
    fn test_food_never_on_snake() {
        let snake = Snake::new(Point::new(10, 10), Direction::Right, 3);
        let mut rng = SessionRng::new(42);
        for _ in 0..100 {
            let food = generate_food(&snake, 20, &mut rng).unwrap();
            assert!(!snake.contains(&food));
        }
    }

    #[test]
    fn test_food_within_bounds() {
        let snake = Snake::from_segments([Point::new(5, 5)]);
        let mut rng = SessionRng::new(3);
        for _ in 0..100 {
            let food = generate_food(&snake, 15, &mut rng).unwrap();
            assert!(food.is_within(15));
        }
    }

    #[test]
    fn test_single_free_cell_is_found() {
        let mut cells = full_rows(4, 4);
        let free = cells.pop().unwrap();
        let snake = Snake::from_segments(cells);
        let mut rng = SessionRng::new(11);
        for _ in 0..10 {
            assert_eq!(generate_food(&snake, 4, &mut rng), Ok(free));
        }
    }

    #[test]
    fn test_full_board_reports_no_space() {
        let snake = Snake::from_segments(full_rows(3, 3));
        let mut rng = SessionRng::new(5);
        assert_eq!(
            generate_food(&snake, 3, &mut rng),
            Err(FoodPlacementError::NoSpace {
                grid_size: 3,
                snake_length: 9
            })
        );
    }

    #[test]
    fn test_same_seed_same_food() {
        let snake = Snake::new(Point::new(10, 10), Direction::Right, 3);
        let a = generate_food(&snake, 20, &mut SessionRng::new(99));
        let b = generate_food(&snake, 20, &mut SessionRng::new(99));
        assert_eq!(a, b);
    }
}
