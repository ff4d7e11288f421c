use crate::games::SessionRng;
use super::game_state::GameState;
use super::types::{Direction, GameMode, Point};

/// Chance of picking a random safe turn instead of the greedy one.
pub const AUTOPILOT_JITTER_PROBABILITY: f64 = 0.10;

/// Greedy one-step food chaser used for spectator and demo playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Autopilot {
    pub jitter_probability: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            jitter_probability: AUTOPILOT_JITTER_PROBABILITY,
        }
    }
}

impl Autopilot {
    pub fn new(jitter_probability: f64) -> Self {
        Self { jitter_probability }
    }

    /// Queues the autopilot's turn on `state`. Does not tick.
    pub fn simulate_move(&self, state: &GameState, rng: &mut SessionRng) -> GameState {
        if !state.is_playing() {
            return state.clone();
        }
        let direction = self.choose_direction(state, rng);
        state.set_direction(direction)
    }

    pub fn choose_direction(&self, state: &GameState, rng: &mut SessionRng) -> Direction {
        let mut safe = Self::safe_moves(state);
        // Stable sort keeps Up, Down, Left, Right order among equal distances.
        safe.sort_by_key(|(_, head)| head.manhattan_distance(state.food));

        let Some(&(greedy, _)) = safe.first() else {
            return state.direction;
        };

        if safe.len() > 1 && rng.chance(self.jitter_probability) {
            let idx = rng.random_range(0..safe.len());
            return safe[idx].0;
        }

        greedy
    }

    /// Non-reversing turns whose unwrapped next head is off the whole current
    /// body, tail included. Only walls mode rejects heads past the edge.
    fn safe_moves(state: &GameState) -> Vec<(Direction, Point)> {
        let head = state.snake.head();
        Direction::ALL
            .into_iter()
            .filter(|d| state.direction.is_valid_change(*d))
            .map(|d| (d, head.step(d)))
            .filter(|(_, p)| state.mode != GameMode::Walls || p.is_within(state.grid_size))
            .filter(|(_, p)| !state.snake.contains(p))
            .collect()
    }
}
