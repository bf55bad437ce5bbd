//! Runner errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Strategy error: {0}")]
    Strategy(#[from] confluence_strategy::Error),

    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse market data: {0}")]
    Parse(String),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Market data contains no bars")]
    NoMarketData,
}

pub type Result<T> = std::result::Result<T, RunnerError>;
