use serde::{Deserialize, Serialize};

use crate::values::{Price, Ratio};

/// Latest technical indicator readings for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReading {
    /// Relative strength index, 0..=100
    pub rsi: Ratio,
    pub sma_short: Price,
    pub sma_long: Price,
    pub vwap: Price,
    /// Average true range, in price units
    pub atr: Price,
    pub current_price: Price,
    /// Number of history bars the reading was computed from
    pub bars: usize,
}

impl TechnicalReading {
    /// Whether enough history backs this reading
    pub fn has_history(&self, min_bars: usize) -> bool {
        self.bars >= min_bars
    }

    /// ATR / price, a dimensionless realized-volatility proxy
    ///
    /// `None` for a non-positive price or when the ratio overflows.
    pub fn volatility_ratio(&self) -> Option<Ratio> {
        if self.current_price <= Price::ZERO {
            return None;
        }
        self.atr.checked_div(self.current_price)
    }

    /// Short-term average above long-term average
    pub fn trend_up(&self) -> bool {
        self.sma_short > self.sma_long
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn reading(price: Price) -> TechnicalReading {
        TechnicalReading {
            rsi: dec!(45),
            sma_short: dec!(101),
            sma_long: dec!(99),
            vwap: dec!(100),
            atr: dec!(2),
            current_price: price,
            bars: 60,
        }
    }

    #[test]
    fn test_volatility_ratio() {
        assert_eq!(reading(dec!(100)).volatility_ratio(), Some(dec!(0.02)));
    }

    #[test]
    fn test_volatility_ratio_zero_price() {
        assert_eq!(reading(Price::ZERO).volatility_ratio(), None);
    }

    #[test]
    fn test_volatility_ratio_near_zero_price() {
        let mut r = reading(dec!(0.0000000000000000000000000001));
        r.atr = dec!(1000000000);
        assert_eq!(r.volatility_ratio(), None);
    }

    #[test]
    fn test_history_requirement() {
        let r = reading(dec!(100));
        assert!(r.has_history(50));
        assert!(r.has_history(60));
        assert!(!r.has_history(61));
    }

    #[test]
    fn test_trend_up() {
        let mut r = reading(dec!(100));
        assert!(r.trend_up());
        r.sma_short = r.sma_long;
        assert!(!r.trend_up());
    }
}
