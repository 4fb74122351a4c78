use std::path::PathBuf;

use crate::game::PlaceError;

/// Why a listener could not take a player seat.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("all {0} player slots are taken")]
    SlotsFull(usize),

    #[error("listener is already registered")]
    AlreadyRegistered,
}

/// Why a column selection was refused. The offending caller is also notified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no game in progress")]
    NotInProgress,

    #[error("not this listener's turn")]
    InvalidTurn,

    #[error("invalid move: {0}")]
    InvalidMove(#[from] PlaceError),
}

/// Contract violations on the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot reset while a game is in progress")]
    ResetWhileInProgress,
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
