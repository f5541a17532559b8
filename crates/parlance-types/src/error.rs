//! Error types for Parlance.

use std::io;

/// Errors produced while setting up a Parlance deployment.
#[derive(Debug, thiserror::Error)]
pub enum ParlanceError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ParlanceError>;
