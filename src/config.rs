//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! field has a default, so a missing file (or a missing section) is fine;
//! a file that exists but does not parse is an error.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::storage::DEFAULT_STATE_FILE;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// Balance each player starts with when `setup` is given none.
    pub starting_balance: u64,
    /// Balance for players seated mid-game.
    pub new_player_balance: u64,
    /// History lines shown by `history` without an argument.
    pub history_lines: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1500,
            new_player_balance: 1500,
            history_lines: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: DEFAULT_STATE_FILE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        ensure!(
            cfg.game.starting_balance > 0,
            "game.starting_balance must be positive"
        );
        Ok(cfg)
    }
}
