use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::PlayerId;
use crate::games::snake::GameMode;
use super::{
    ActivePlayer, LeaderboardEntry, LeaderboardError, PlayerDirectory, ScoreSink, ScoreSubmission,
    SubmitResult,
};

struct LeaderboardInner {
    entries: Vec<LeaderboardEntry>,
    available: bool,
}

/// Process-local leaderboard. Entries stay ordered by score, best first.
#[derive(Clone)]
pub struct InMemoryLeaderboard {
    username: String,
    inner: Arc<Mutex<LeaderboardInner>>,
}

impl InMemoryLeaderboard {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            inner: Arc::new(Mutex::new(LeaderboardInner {
                entries: Vec::new(),
                available: true,
            })),
        }
    }

    /// Simulates the backend going away; submissions fail until re-enabled.
    pub async fn set_available(&self, available: bool) {
        self.inner.lock().await.available = available;
    }

    /// Best entries, optionally for one mode, with ranks renumbered within the result.
    pub async fn top(&self, mode: Option<GameMode>, limit: usize) -> Vec<LeaderboardEntry> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .filter(|e| mode.is_none_or(|m| e.mode == m))
            .take(limit)
            .enumerate()
            .map(|(idx, e)| LeaderboardEntry {
                rank: idx as u32 + 1,
                ..e.clone()
            })
            .collect()
    }
}

impl ScoreSink for InMemoryLeaderboard {
    async fn submit_score(&self, submission: ScoreSubmission) -> Result<SubmitResult, LeaderboardError> {
        let mut inner = self.inner.lock().await;
        if !inner.available {
            return Err(LeaderboardError::Unavailable("backend offline".to_string()));
        }

        let is_high_score = inner
            .entries
            .iter()
            .filter(|e| e.mode == submission.mode)
            .all(|e| submission.score > e.score);

        // Ranked within the mode; equal scores share a rank.
        let rank = inner
            .entries
            .iter()
            .filter(|e| e.mode == submission.mode && e.score > submission.score)
            .count() as u32
            + 1;

        let position = inner
            .entries
            .iter()
            .position(|e| e.score < submission.score)
            .unwrap_or(inner.entries.len());

        inner.entries.insert(
            position,
            LeaderboardEntry {
                username: self.username.clone(),
                score: submission.score,
                mode: submission.mode,
                recorded_at: Utc::now(),
                rank,
            },
        );

        Ok(SubmitResult {
            rank: Some(rank),
            is_high_score,
        })
    }
}

#[derive(Clone)]
pub struct InMemoryPlayerDirectory {
    players: Arc<Vec<ActivePlayer>>,
}

impl InMemoryPlayerDirectory {
    pub fn new(players: Vec<ActivePlayer>) -> Self {
        Self {
            players: Arc::new(players),
        }
    }

    /// A small fixed roster of live players for demo playback.
    pub fn with_demo_players() -> Self {
        let now = Utc::now();
        let player = |id: &str, username: &str, score: u32, mode: GameMode, minutes_ago: i64| ActivePlayer {
            id: PlayerId::from(id),
            username: username.to_string(),
            current_score: score,
            mode,
            is_live: true,
            started_at: now - Duration::minutes(minutes_ago),
        };
        Self::new(vec![
            player("live1", "SwiftCobra", 340, GameMode::Walls, 2),
            player("live2", "GoldenViper", 580, GameMode::PassThrough, 5),
            player("live3", "SilentMamba", 220, GameMode::Walls, 1),
            player("live4", "FiercePython", 890, GameMode::PassThrough, 8),
        ])
    }
}

impl PlayerDirectory for InMemoryPlayerDirectory {
    async fn active_players(&self) -> Result<Vec<ActivePlayer>, LeaderboardError> {
        Ok(self.players.iter().filter(|p| p.is_live).cloned().collect())
    }

    async fn watch_player(&self, player_id: &PlayerId) -> Result<bool, LeaderboardError> {
        Ok(self.players.iter().any(|p| p.is_live && &p.id == player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(score: u32, mode: GameMode) -> ScoreSubmission {
        ScoreSubmission {
            score,
            mode,
            duration_secs: 30,
        }
    }

    #[tokio::test]
    async fn test_first_submission_is_rank_one_high_score() {
        let board = InMemoryLeaderboard::new("tester");
        let result = board.submit_score(submission(100, GameMode::Walls)).await;
        assert_eq!(
            result,
            Ok(SubmitResult {
                rank: Some(1),
                is_high_score: true
            })
        );
    }

    #[tokio::test]
    async fn test_ranks_follow_score_order() {
        let board = InMemoryLeaderboard::new("tester");
        board.submit_score(submission(300, GameMode::Walls)).await.unwrap();
        board.submit_score(submission(100, GameMode::Walls)).await.unwrap();

        let middle = board.submit_score(submission(200, GameMode::Walls)).await.unwrap();
        assert_eq!(middle.rank, Some(2));
        assert!(!middle.is_high_score);

        let tie = board.submit_score(submission(300, GameMode::Walls)).await.unwrap();
        assert_eq!(tie.rank, Some(1));
        assert!(!tie.is_high_score);

        let scores: Vec<u32> = board.top(None, 10).await.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 300, 200, 100]);
    }

    #[tokio::test]
    async fn test_high_score_is_per_mode() {
        let board = InMemoryLeaderboard::new("tester");
        board.submit_score(submission(500, GameMode::Walls)).await.unwrap();
        let result = board.submit_score(submission(50, GameMode::PassThrough)).await.unwrap();
        assert!(result.is_high_score);
        assert_eq!(result.rank, Some(1));

        let pass_through = board.top(Some(GameMode::PassThrough), 10).await;
        assert_eq!(pass_through.len(), 1);
        assert_eq!(pass_through[0].rank, 1);
    }

    #[tokio::test]
    async fn test_rank_ignores_other_modes_and_shares_ties() {
        let board = InMemoryLeaderboard::new("tester");
        board.submit_score(submission(500, GameMode::PassThrough)).await.unwrap();

        let first = board.submit_score(submission(100, GameMode::Walls)).await.unwrap();
        let second = board.submit_score(submission(100, GameMode::Walls)).await.unwrap();
        assert_eq!(first.rank, Some(1));
        assert_eq!(second.rank, Some(1));
        assert!(first.is_high_score);
        assert!(!second.is_high_score);

        let lower = board.submit_score(submission(40, GameMode::Walls)).await.unwrap();
        assert_eq!(lower.rank, Some(3));
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_without_recording() {
        let board = InMemoryLeaderboard::new("tester");
        board.set_available(false).await;
        let result = board.submit_score(submission(10, GameMode::Walls)).await;
        assert!(matches!(result, Err(LeaderboardError::Unavailable(_))));

        board.set_available(true).await;
        assert!(board.top(None, 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_directory_lists_only_live_players() {
        let mut players = InMemoryPlayerDirectory::with_demo_players()
            .active_players()
            .await
            .unwrap();
        assert_eq!(players.len(), 4);

        players[0].is_live = false;
        let directory = InMemoryPlayerDirectory::new(players);
        assert_eq!(directory.active_players().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_watch_player_only_accepts_live_players() {
        let mut players = InMemoryPlayerDirectory::with_demo_players()
            .active_players()
            .await
            .unwrap();
        players[0].is_live = false;
        let directory = InMemoryPlayerDirectory::new(players);

        assert_eq!(directory.watch_player(&PlayerId::from("live1")).await, Ok(false));
        assert_eq!(directory.watch_player(&PlayerId::from("live2")).await, Ok(true));
        assert_eq!(directory.watch_player(&PlayerId::from("nobody")).await, Ok(false));
    }
}
