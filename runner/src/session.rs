use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use snake_common::config::ConfigContentProvider;
use snake_common::games::SessionRng;
use snake_common::games::snake::{Autopilot, Direction, GameEndReason, GameMode, GameState, GameStatus};
use snake_common::high_score::HighScoreStore;
use snake_common::leaderboard::{ScoreSink, ScoreSubmission, SubmitResult};
use snake_common::log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Turn(Direction),
    TogglePause,
    Stop,
}

/// Who steers the snake between ticks.
#[derive(Debug, Clone, Copy)]
pub enum Controller {
    Commands,
    Autopilot(Autopilot),
}

/// Receives every state the session produces; the render boundary.
pub trait StateObserver: Send {
    fn on_state(&mut self, state: &GameState);
}

pub struct LogObserver {
    label: String,
    last_score: Option<u32>,
    last_status: Option<GameStatus>,
}

impl LogObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_score: None,
            last_status: None,
        }
    }
}

impl StateObserver for LogObserver {
    fn on_state(&mut self, state: &GameState) {
        if self.last_status != Some(state.status) {
            match (state.status, state.end_reason) {
                (GameStatus::GameOver, Some(reason)) => log!(
                    "[{}] Game over: snake {} with score {} (length {})",
                    self.label,
                    reason,
                    state.score,
                    state.snake.len()
                ),
                (status, _) => log!("[{}] Status: {:?}", self.label, status),
            }
            self.last_status = Some(state.status);
        }
        if self.last_score != Some(state.score) {
            log!(
                "[{}] Score {} | food at {} | tick every {}ms",
                self.label,
                state.score,
                state.food,
                state.speed
            );
            self.last_score = Some(state.score);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub score: u32,
    pub mode: GameMode,
    pub duration_secs: u64,
    pub end_reason: Option<GameEndReason>,
    pub ticks: u64,
}

impl GameOutcome {
    pub fn submission(&self) -> ScoreSubmission {
        ScoreSubmission {
            score: self.score,
            mode: self.mode,
            duration_secs: self.duration_secs,
        }
    }
}

fn tick_timer(state: &GameState) -> Interval {
    let period = state.tick_interval();
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Plays `state` until it ends, the session is stopped, or the command channel closes.
///
/// Ticks are paced by the state's current speed; the timer is rebuilt whenever eating
/// changes it. Commands are applied between ticks, so at most one turn lands per move.
pub async fn run_game_loop<O: StateObserver>(
    state: GameState,
    rng: &mut SessionRng,
    commands: &mut mpsc::UnboundedReceiver<SessionCommand>,
    controller: Controller,
    observer: &mut O,
) -> GameOutcome {
    let started_at = Utc::now();
    let mut state = state.start();
    let mut ticks = 0u64;
    let mut timer = tick_timer(&state);
    let mut current_speed = state.speed;

    observer.on_state(&state);

    loop {
        tokio::select! {
            _ = timer.tick() => {
                if !state.is_playing() {
                    continue;
                }
                if let Controller::Autopilot(autopilot) = controller {
                    state = autopilot.simulate_move(&state, rng);
                }
                state = state.move_snake(rng);
                ticks += 1;
                observer.on_state(&state);

                if state.is_game_over() {
                    break;
                }
                if state.speed != current_speed {
                    current_speed = state.speed;
                    timer = tick_timer(&state);
                }
            }
            command = commands.recv() => {
                match command {
                    Some(SessionCommand::Turn(direction)) => {
                        state = state.set_direction(direction);
                    }
                    Some(SessionCommand::TogglePause) => {
                        let status = state.status;
                        state = match status {
                            GameStatus::Playing => state.pause(),
                            GameStatus::Paused => state.resume(),
                            _ => state,
                        };
                        observer.on_state(&state);
                    }
                    Some(SessionCommand::Stop) | None => {
                        log!("Session stopped after {} ticks", ticks);
                        break;
                    }
                }
            }
        }
    }

    let duration_secs = (Utc::now() - started_at).num_seconds().max(0) as u64;

    GameOutcome {
        score: state.score,
        mode: state.mode,
        duration_secs,
        end_reason: state.end_reason,
        ticks,
    }
}

/// Records the local high score and hands the result to the sink in the background.
///
/// Neither step can affect the finished game: failures are only logged.
pub fn report_outcome<P, S>(
    outcome: &GameOutcome,
    high_scores: &HighScoreStore<P>,
    sink: &S,
) -> JoinHandle<Option<SubmitResult>>
where
    P: ConfigContentProvider,
    S: ScoreSink,
{
    match high_scores.record(outcome.mode, outcome.score) {
        Ok(true) => log!("New local high score for {}: {}", outcome.mode, outcome.score),
        Ok(false) => {}
        Err(e) => log!("Failed to update local high score: {}", e),
    }

    let sink = sink.clone();
    let submission = outcome.submission();
    tokio::spawn(async move {
        match sink.submit_score(submission).await {
            Ok(result) => {
                match (result.is_high_score, result.rank) {
                    (true, Some(rank)) => log!("New high score! Rank #{}", rank),
                    (_, Some(rank)) => log!("Score submitted. Rank #{}", rank),
                    (_, None) => log!("Score submitted"),
                }
                Some(result)
            }
            Err(e) => {
                log!("Failed to submit score: {}", e);
                None
            }
        }
    })
}
