use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;

use snake_common::PlayerId;
use snake_common::games::SessionRng;
use snake_common::games::snake::{Autopilot, GameSetupError, GameState};
use snake_common::leaderboard::{LeaderboardError, PlayerDirectory};
use snake_common::log;

use crate::session::{Controller, GameOutcome, SessionCommand, StateObserver, run_game_loop};

#[derive(Debug, Clone, Copy)]
pub struct SpectatorSettings {
    pub grid_size: i32,
    pub restart_delay: Duration,
    pub max_restarts: u32,
    pub autopilot: Autopilot,
}

#[derive(Debug)]
pub enum SpectatorError {
    Directory(LeaderboardError),
    PlayerNotFound(PlayerId),
    Setup(GameSetupError),
}

impl fmt::Display for SpectatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectatorError::Directory(e) => write!(f, "Failed to fetch active players: {}", e),
            SpectatorError::PlayerNotFound(id) => write!(f, "No live player with id {}", id),
            SpectatorError::Setup(e) => write!(f, "Failed to set up spectator game: {}", e),
        }
    }
}

impl std::error::Error for SpectatorError {}

impl From<LeaderboardError> for SpectatorError {
    fn from(e: LeaderboardError) -> Self {
        SpectatorError::Directory(e)
    }
}

impl From<GameSetupError> for SpectatorError {
    fn from(e: GameSetupError) -> Self {
        SpectatorError::Setup(e)
    }
}

/// Simulates a live player's game locally with the autopilot.
///
/// The first game starts from the player's mode and current score; after each game
/// over a fresh board is started, up to `max_restarts` times. Nothing is synchronised
/// with the real player.
pub async fn watch<D, O>(
    directory: &D,
    player_id: &PlayerId,
    settings: &SpectatorSettings,
    rng: &mut SessionRng,
    observer: &mut O,
) -> Result<Vec<GameOutcome>, SpectatorError>
where
    D: PlayerDirectory,
    O: StateObserver,
{
    let players = directory.active_players().await?;
    let player = players
        .into_iter()
        .find(|p| &p.id == player_id)
        .ok_or_else(|| SpectatorError::PlayerNotFound(player_id.clone()))?;

    log!(
        "Watching {} ({} mode, score {})",
        player.username,
        player.mode,
        player.current_score
    );

    match directory.watch_player(player_id).await {
        Ok(true) => {}
        Ok(false) => log!("Player {} is no longer live, replaying anyway", player.username),
        Err(e) => log!("Failed to register as spectator of {}: {}", player.username, e),
    }

    // Held open so the loop only ends on game over.
    let (_command_tx, mut command_rx) = mpsc::unbounded_channel::<SessionCommand>();
    let controller = Controller::Autopilot(settings.autopilot);

    let mut outcomes = Vec::new();
    let mut state = GameState::new(player.mode, settings.grid_size, rng)?.with_score(player.current_score);

    loop {
        let outcome = run_game_loop(state, rng, &mut command_rx, controller, observer).await;
        outcomes.push(outcome);

        if outcomes.len() > settings.max_restarts as usize {
            break;
        }

        tokio::time::sleep(settings.restart_delay).await;
        log!("Restarting spectator game for {}", player.username);
        state = GameState::new(player.mode, settings.grid_size, rng)?;
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use snake_common::games::snake::{DEFAULT_GRID_SIZE, GameMode};
    use snake_common::leaderboard::{ActivePlayer, InMemoryPlayerDirectory};

    struct NullObserver;

    impl StateObserver for NullObserver {
        fn on_state(&mut self, _state: &GameState) {}
    }

    #[derive(Clone)]
    struct OfflineDirectory;

    impl PlayerDirectory for OfflineDirectory {
        async fn active_players(&self) -> Result<Vec<ActivePlayer>, LeaderboardError> {
            Err(LeaderboardError::Unavailable("timeout".to_string()))
        }

        async fn watch_player(&self, _player_id: &PlayerId) -> Result<bool, LeaderboardError> {
            Err(LeaderboardError::Unavailable("timeout".to_string()))
        }
    }

    /// Lists players fine but cannot register spectators.
    #[derive(Clone)]
    struct WatchRefusingDirectory(InMemoryPlayerDirectory);

    impl PlayerDirectory for WatchRefusingDirectory {
        async fn active_players(&self) -> Result<Vec<ActivePlayer>, LeaderboardError> {
            self.0.active_players().await
        }

        async fn watch_player(&self, _player_id: &PlayerId) -> Result<bool, LeaderboardError> {
            Err(LeaderboardError::Unavailable("watch endpoint down".to_string()))
        }
    }

    fn settings(max_restarts: u32) -> SpectatorSettings {
        SpectatorSettings {
            grid_size: DEFAULT_GRID_SIZE,
            restart_delay: Duration::from_millis(2000),
            max_restarts,
            autopilot: Autopilot::default(),
        }
    }

    fn directory() -> InMemoryPlayerDirectory {
        InMemoryPlayerDirectory::new(vec![ActivePlayer {
            id: PlayerId::from("live1"),
            username: "Watched".to_string(),
            current_score: 340,
            mode: GameMode::Walls,
            is_live: true,
            started_at: Utc::now(),
        }])
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_seeds_score_and_restarts() {
        let mut rng = SessionRng::new(8);
        let outcomes = watch(
            &directory(),
            &PlayerId::from("live1"),
            &settings(2),
            &mut rng,
            &mut NullObserver,
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.mode == GameMode::Walls));
        assert!(outcomes.iter().all(|o| o.end_reason.is_some()));
        assert!(outcomes[0].score >= 340);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_registration_failure_is_tolerated() {
        let mut rng = SessionRng::new(8);
        let outcomes = watch(
            &WatchRefusingDirectory(directory()),
            &PlayerId::from("live1"),
            &settings(0),
            &mut rng,
            &mut NullObserver,
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].score >= 340);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_player_is_reported() {
        let mut rng = SessionRng::new(8);
        let result = watch(
            &directory(),
            &PlayerId::from("ghost"),
            &settings(0),
            &mut rng,
            &mut NullObserver,
        )
        .await;
        assert!(matches!(result, Err(SpectatorError::PlayerNotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_directory_failure_is_reported() {
        let mut rng = SessionRng::new(8);
        let result = watch(
            &OfflineDirectory,
            &PlayerId::from("live1"),
            &settings(0),
            &mut rng,
            &mut NullObserver,
        )
        .await;
        assert!(matches!(result, Err(SpectatorError::Directory(_))));
    }
}
