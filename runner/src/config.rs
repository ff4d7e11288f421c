use serde::{Deserialize, Serialize};
use snake_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use snake_common::games::snake::{AUTOPILOT_JITTER_PROBABILITY, DEFAULT_GRID_SIZE, GameMode, MIN_GRID_SIZE};

pub const CONFIG_FILE: &str = "snake_runner_config.yaml";
const MAX_GRID_SIZE: i32 = 100;

pub fn get_config_manager(path: &str) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub spectator: SpectatorConfig,
    pub high_score_file: String,
    pub username: String,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        self.spectator.validate()?;
        if self.high_score_file.is_empty() {
            return Err("high_score_file must not be empty".to_string());
        }
        if self.username.is_empty() {
            return Err("username must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    pub mode: GameMode,
    pub grid_size: i32,
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < MIN_GRID_SIZE || self.grid_size > MAX_GRID_SIZE {
            return Err(format!(
                "grid_size must be between {} and {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE
            ));
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SpectatorConfig {
    pub restart_delay_ms: u64,
    pub max_restarts: u32,
    pub jitter_probability: f64,
}

impl Validate for SpectatorConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.jitter_probability) {
            return Err("jitter_probability must be between 0.0 and 1.0".to_string());
        }
        if self.restart_delay_ms > 60_000 {
            return Err("restart_delay_ms must not exceed 60000".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig {
                mode: GameMode::PassThrough,
                grid_size: DEFAULT_GRID_SIZE,
            },
            spectator: SpectatorConfig {
                restart_delay_ms: 2000,
                max_restarts: 3,
                jitter_probability: AUTOPILOT_JITTER_PROBABILITY,
            },
            high_score_file: "snake_high_scores.yaml".to_string(),
            username: "Player".to_string(),
        }
    }
}
