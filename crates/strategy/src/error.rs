//! Strategy errors

use confluence_indicators::IndicatorError;
use confluence_risk::RiskConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid sizing configuration: {0}")]
    Risk(#[from] RiskConfigError),

    #[error("Invalid indicator configuration: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Instrument {0} appears more than once in the universe")]
    DuplicateInstrument(String),

    #[error("Failed to parse strategy: {0}")]
    Parse(String),

    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },
}

pub type Result<T> = std::result::Result<T, Error>;
