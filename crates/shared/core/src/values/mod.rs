use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Dimensionless ratio or score (ownership %, sentiment, ROE, ATR / price)
pub type Ratio = Decimal;

/// Portfolio weight in [0, 1]
pub type Weight = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;
