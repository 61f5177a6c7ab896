use std::path::PathBuf;

use crate::game::Action;

/// Errors raised by the rules engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("action {0} is not legal in this position")]
    InvalidAction(Action),

    #[error("unknown card id {0}")]
    UnknownCard(usize),

    #[error("invalid match setup: {0}")]
    InvalidSetup(String),
}

/// Errors that can occur during checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("no usable approximators at {path}: {reason}")]
    ApproximatorUnavailable { path: PathBuf, reason: String },

    #[error("malformed checkpoint at {path}: {reason}")]
    MalformedCheckpoint { path: PathBuf, reason: String },

    #[error("failed to save model: {0}")]
    ModelSave(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckpointError {
    /// Load-side failures that are handled by starting from fresh approximators.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CheckpointError::ApproximatorUnavailable { .. }
                | CheckpointError::MalformedCheckpoint { .. }
        )
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
