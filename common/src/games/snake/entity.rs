use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

/// Snake body, head first. The set mirrors the deque for constant-time lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    /// Lays out `length` segments behind `head`, opposite to `direction`.
    pub fn new(head: Point, direction: Direction, length: usize) -> Self {
        let behind = direction.opposite();
        let mut segments = Vec::with_capacity(length);
        let mut current = head;
        for _ in 0..length.max(1) {
            segments.push(current);
            current = current.step(behind);
        }
        Self::from_segments(segments)
    }

    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> Self {
        let body: VecDeque<Point> = segments.into_iter().collect();
        assert!(!body.is_empty(), "Snake needs at least one segment");
        let body_set = body.iter().copied().collect();
        Self { body, body_set }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    /// Whether `point` hits the body once the tail has moved on.
    pub fn collides_after_tail_moves(&self, point: &Point) -> bool {
        self.contains(point) && *point != self.tail()
    }

    /// Moves the head to `new_head`, keeping the tail when `grow` is set.
    pub(crate) fn advance(&mut self, new_head: Point, grow: bool) {
        if !grow
            && let Some(tail) = self.body.pop_back()
        {
            self.body_set.remove(&tail);
        }
        self.body.push_front(new_head);
        self.body_set.insert(new_head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_extends_behind_head() {
        let snake = Snake::new(Point::new(10, 10), Direction::Right, 3);
        let segments: Vec<Point> = snake.segments().copied().collect();
        assert_eq!(
            segments,
            vec![Point::new(10, 10), Point::new(9, 10), Point::new(8, 10)]
        );
        assert_eq!(snake.head(), Point::new(10, 10));
        assert_eq!(snake.tail(), Point::new(8, 10));
    }

    #[test]
    fn test_advance_into_vacated_tail_keeps_lookup_consistent() {
        // 2x2 loop: head chases its own tail.
        let mut snake = Snake::from_segments([
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(0, 1),
        ]);
        let tail = snake.tail();
        assert!(!snake.collides_after_tail_moves(&tail));
        snake.advance(tail, false);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Point::new(0, 1));
        assert!(snake.contains(&Point::new(0, 1)));
        assert!(!snake.contains(&Point::new(0, 2)));
    }

    #[test]
    fn test_advance_with_growth_keeps_tail() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Up, 3);
        let tail = snake.tail();
        snake.advance(Point::new(5, 4), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), tail);
    }
}
