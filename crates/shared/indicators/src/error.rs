use thiserror::Error;

/// Invalid indicator configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Indicator length must be positive: {0}")]
    ZeroLength(&'static str),

    #[error("Short SMA length {short} must be below long SMA length {long}")]
    ShortNotBelowLong { short: usize, long: usize },

    #[error("Minimum history {min_history} is shorter than the {required} bars the indicators need")]
    HistoryTooShort { min_history: usize, required: usize },
}
