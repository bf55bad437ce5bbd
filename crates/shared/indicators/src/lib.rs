//! Confluence Indicators
//!
//! Price-derived technical indicators computed from OHLCV history.
//!
//! Every indicator returns an ordered series whose last element is the
//! current reading. An empty series means there is not enough history
//! (or the requested length is zero); callers treat that as "unavailable",
//! never as zero.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use confluence_indicators::{compute_reading, IndicatorLengths};
//!
//! let reading = compute_reading(&bars, &IndicatorLengths::default(), 50);
//! ```

pub mod error;
pub mod momentum;
pub mod reading;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use error::IndicatorError;
pub use momentum::rsi;
pub use reading::{IndicatorLengths, compute_reading};
pub use trend::sma;
pub use volatility::atr;
pub use volume::vwap;
