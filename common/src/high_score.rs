use serde::{Deserialize, Serialize};

use crate::config::{
    ConfigContentProvider, ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
};
use crate::games::snake::GameMode;

/// Best local score per mode, as persisted on disk.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HighScores {
    #[serde(default)]
    pub pass_through: u32,
    #[serde(default)]
    pub walls: u32,
}

impl HighScores {
    pub fn get(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::PassThrough => self.pass_through,
            GameMode::Walls => self.walls,
        }
    }

    fn set(&mut self, mode: GameMode, score: u32) {
        match mode {
            GameMode::PassThrough => self.pass_through = score,
            GameMode::Walls => self.walls = score,
        }
    }
}

impl Validate for HighScores {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

pub struct HighScoreStore<P: ConfigContentProvider = FileContentConfigProvider> {
    manager: ConfigManager<P, HighScores, YamlConfigSerializer>,
}

impl HighScoreStore<FileContentConfigProvider> {
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self {
            manager: ConfigManager::from_yaml_file(file_path),
        }
    }
}

impl<P: ConfigContentProvider> HighScoreStore<P> {
    pub fn new(provider: P) -> Self {
        Self {
            manager: ConfigManager::new(provider, YamlConfigSerializer::new()),
        }
    }

    /// Stored best for `mode`; 0 when nothing has been recorded yet.
    pub fn get(&self, mode: GameMode) -> Result<u32, String> {
        Ok(self.manager.get_config()?.get(mode))
    }

    /// Persists `score` if it beats the stored best and reports whether it did.
    pub fn record(&self, mode: GameMode, score: u32) -> Result<bool, String> {
        let mut scores = self.manager.get_config()?;
        if score <= scores.get(mode) {
            return Ok(false);
        }
        scores.set(mode, score);
        self.manager.set_config(&scores)?;
        Ok(true)
    }
}
