//! Collaborators outside the engine: where finished scores go and who is
//! currently playing. Both are async and may fail; callers must keep the game
//! running when they do.

mod in_memory;

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};

use crate::PlayerId;
use crate::games::snake::GameMode;

pub use in_memory::{InMemoryLeaderboard, InMemoryPlayerDirectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub score: u32,
    pub mode: GameMode,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitResult {
    pub rank: Option<u32>,
    pub is_high_score: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
    pub mode: GameMode,
    pub recorded_at: DateTime<Utc>,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePlayer {
    pub id: PlayerId,
    pub username: String,
    pub current_score: u32,
    pub mode: GameMode,
    pub is_live: bool,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    Unavailable(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardError::Unavailable(reason) => write!(f, "Leaderboard unavailable: {}", reason),
        }
    }
}

impl std::error::Error for LeaderboardError {}

pub trait ScoreSink: Send + Sync + Clone + 'static {
    fn submit_score(
        &self,
        submission: ScoreSubmission,
    ) -> impl Future<Output = Result<SubmitResult, LeaderboardError>> + Send;
}

pub trait PlayerDirectory: Send + Sync + Clone + 'static {
    fn active_players(&self) -> impl Future<Output = Result<Vec<ActivePlayer>, LeaderboardError>> + Send;

    /// Announces a spectator. Returns whether the player is still live.
    fn watch_player(&self, player_id: &PlayerId) -> impl Future<Output = Result<bool, LeaderboardError>> + Send;
}
