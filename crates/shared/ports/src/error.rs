use thiserror::Error;

/// Errors raised by external data providers
///
/// The harness treats every variant as missing data for the affected
/// instrument; none of them aborts an interval.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Malformed record for {instrument}: {reason}")]
    MalformedRecord { instrument: String, reason: String },
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
