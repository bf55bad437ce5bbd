//! Volatility indicators: ATR

use confluence_core::{Bar, Price};
use rust_decimal::Decimal;

/// Average True Range series
///
/// Rolling simple mean of the true range; the first bar only seeds the
/// previous close, so `length + 1` bars are needed for the first value.
pub fn atr(bars: &[Bar], length: usize) -> Vec<Price> {
    if length == 0 || bars.len() < length + 1 {
        return Vec::new();
    }

    let ranges: Vec<Price> = bars
        .windows(2)
        .map(|w| w[1].true_range(Some(w[0].close)))
        .collect();
    let divisor = Decimal::from(length);

    ranges
        .windows(length)
        .map(|w| w.iter().sum::<Decimal>() / divisor)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bars_from_closes;
    use rust_decimal_macros::dec;

    #[test]
    fn test_atr_constant_range() {
        // high - low = 2 and closes unchanged → every true range is 2
        let bars = bars_from_closes(&[dec!(100); 6]);
        assert_eq!(atr(&bars, 3), vec![dec!(2), dec!(2), dec!(2)]);
    }

    #[test]
    fn test_atr_includes_gaps() {
        // close jumps by 10: true range = |high - prev_close| = 11
        let bars = bars_from_closes(&[dec!(100), dec!(110)]);
        assert_eq!(atr(&bars, 1), vec![dec!(11)]);
    }

    #[test]
    fn test_atr_insufficient_data() {
        let bars = bars_from_closes(&[dec!(100), dec!(101)]);
        assert!(atr(&bars, 2).is_empty());
    }
}
