//! Command engine configuration, loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ParlanceError, Result};
use crate::player::Player;

/// What happens when a command is registered under a `(prefix, name)` that is
/// already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Refuse the second registration.
    #[default]
    Reject,
    /// Supersede the existing command.
    Replace,
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    /// Prefix used for commands built without an explicit prefix.
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Players known to the console front-end.
    #[serde(default)]
    pub players: Vec<Player>,
}

fn default_prefix() -> String {
    "/".to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            default_prefix: default_prefix(),
            duplicate_policy: DuplicatePolicy::default(),
            players: Vec::new(),
        }
    }
}

impl CommandConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded command configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_prefix.chars().any(char::is_whitespace) {
            return Err(ParlanceError::Config(format!(
                "default_prefix must not contain whitespace: {:?}",
                self.default_prefix
            )));
        }
        for (index, player) in self.players.iter().enumerate() {
            if self.players[..index].iter().any(|p| p.id == player.id) {
                return Err(ParlanceError::Config(format!(
                    "duplicate player id {}",
                    player.id
                )));
            }
        }
        Ok(())
    }
}
