use std::path::PathBuf;

/// The closed set of ways a game operation can be rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InsufficientFunds,
    NotYourTurn,
    IllegalTarget,
    IllegalMove,
    GameState,
    NotFound,
}

/// Errors returned by every fallible game operation.
///
/// A rejected operation never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoupError {
    #[error("{0}")]
    InsufficientFunds(String),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("{0}")]
    IllegalTarget(String),

    #[error("{0}")]
    IllegalMove(String),

    #[error("{0}")]
    GameState(String),

    #[error("Maximum {max} players allowed")]
    TooManyPlayers { max: usize },

    #[error("invalid coin amount {amount}")]
    InvalidAmount { amount: u32 },

    #[error("Player not found: {0}")]
    NotFound(String),
}

impl CoupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoupError::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            CoupError::NotYourTurn => ErrorKind::NotYourTurn,
            CoupError::IllegalTarget(_) => ErrorKind::IllegalTarget,
            CoupError::IllegalMove(_) | CoupError::InvalidAmount { .. } => ErrorKind::IllegalMove,
            CoupError::GameState(_) | CoupError::TooManyPlayers { .. } => ErrorKind::GameState,
            CoupError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    pub(crate) fn insufficient(message: impl Into<String>) -> Self {
        CoupError::InsufficientFunds(message.into())
    }

    pub(crate) fn illegal_move(message: impl Into<String>) -> Self {
        CoupError::IllegalMove(message.into())
    }

    pub(crate) fn illegal_target(message: impl Into<String>) -> Self {
        CoupError::IllegalTarget(message.into())
    }

    pub(crate) fn game_state(message: impl Into<String>) -> Self {
        CoupError::GameState(message.into())
    }
}

/// Errors that can occur when loading a [`crate::config::RulesConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
