mod config;
mod input;
mod session;
mod spectator;

use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use snake_common::games::SessionRng;
use snake_common::games::snake::{Autopilot, GameMode, GameState};
use snake_common::high_score::HighScoreStore;
use snake_common::leaderboard::{InMemoryLeaderboard, InMemoryPlayerDirectory};
use snake_common::{PlayerId, log, logger};

use session::{Controller, LogObserver, report_outcome, run_game_loop};
use spectator::SpectatorSettings;

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    /// Path to the YAML config; defaults are used when the file does not exist.
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: String,

    #[arg(long)]
    mode: Option<GameMode>,

    #[arg(long)]
    grid_size: Option<i32>,

    /// Let the autopilot play instead of reading moves from stdin.
    #[arg(long)]
    autopilot: bool,

    /// Watch a live player by id through a local autopilot simulation.
    #[arg(long)]
    spectate: Option<String>,

    /// Seed for food placement and autopilot jitter.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Snake".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut cfg = config::get_config_manager(&args.config).get_config()?;
    if let Some(mode) = args.mode {
        cfg.game.mode = mode;
    }
    if let Some(grid_size) = args.grid_size {
        cfg.game.grid_size = grid_size;
    }
    snake_common::config::Validate::validate(&cfg)?;

    let mut rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("Session seed {}", rng.seed());

    let autopilot = Autopilot::new(cfg.spectator.jitter_probability);

    if let Some(player_id) = args.spectate {
        let directory = InMemoryPlayerDirectory::with_demo_players();
        let settings = SpectatorSettings {
            grid_size: cfg.game.grid_size,
            restart_delay: Duration::from_millis(cfg.spectator.restart_delay_ms),
            max_restarts: cfg.spectator.max_restarts,
            autopilot,
        };
        let mut observer = LogObserver::new(format!("watch:{}", player_id));
        let outcomes = spectator::watch(
            &directory,
            &PlayerId::new(player_id),
            &settings,
            &mut rng,
            &mut observer,
        )
        .await?;
        log!("Spectated {} games", outcomes.len());
        return Ok(());
    }

    let high_scores = HighScoreStore::from_yaml_file(&cfg.high_score_file);
    match high_scores.get(cfg.game.mode) {
        Ok(best) => log!("Local high score for {}: {}", cfg.game.mode, best),
        Err(e) => log!("Failed to read local high score: {}", e),
    }
    let leaderboard = InMemoryLeaderboard::new(cfg.username.clone());

    let state = GameState::new(cfg.game.mode, cfg.game.grid_size, &mut rng)?;
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();

    let controller = if args.autopilot {
        Controller::Autopilot(autopilot)
    } else {
        log!("Controls: w/a/s/d + Enter to turn, p to pause, q to quit");
        tokio::spawn(input::forward_stdin(command_tx.clone()));
        Controller::Commands
    };

    let mut observer = LogObserver::new(cfg.username.clone());
    let outcome = run_game_loop(state, &mut rng, &mut command_rx, controller, &mut observer).await;
    drop(command_tx);

    log!(
        "Final score {} in {}s over {} ticks",
        outcome.score,
        outcome.duration_secs,
        outcome.ticks
    );

    if report_outcome(&outcome, &high_scores, &leaderboard).await.is_err() {
        log!("Score submission task failed");
    }

    Ok(())
}
