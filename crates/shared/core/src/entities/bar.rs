use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{Price, Timestamp};

/// One OHLCV bar of instrument history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Decimal,
}

impl Bar {
    pub fn new(
        timestamp: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price (high + low + close) / 3
    pub fn typical_price(&self) -> Price {
        (self.high + self.low + self.close) / Decimal::from(3)
    }

    /// True range against the previous bar's close
    ///
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: Option<Price>) -> Price {
        let range = self.high - self.low;
        match prev_close {
            Some(prev) => range
                .max((self.high - prev).abs())
                .max((self.low - prev).abs()),
            None => range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn bar(high: Decimal, low: Decimal, close: Decimal) -> Bar {
        Bar::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            close,
            high,
            low,
            close,
            dec!(1000),
        )
    }

    #[test]
    fn test_typical_price() {
        let b = bar(dec!(12), dec!(9), dec!(9));
        assert_eq!(b.typical_price(), dec!(10));
    }

    #[test]
    fn test_true_range_without_previous_close() {
        let b = bar(dec!(105), dec!(100), dec!(102));
        assert_eq!(b.true_range(None), dec!(5));
    }

    #[test]
    fn test_true_range_gap_up() {
        // Gap above previous close: |low - prev| is smaller than |high - prev|
        let b = bar(dec!(110), dec!(106), dec!(108));
        assert_eq!(b.true_range(Some(dec!(100))), dec!(10));
    }

    #[test]
    fn test_true_range_gap_down() {
        let b = bar(dec!(95), dec!(90), dec!(92));
        assert_eq!(b.true_range(Some(dec!(100))), dec!(10));
    }
}
