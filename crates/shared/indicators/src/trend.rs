//! Trend indicators: SMA

use rust_decimal::Decimal;

/// Simple moving average series
///
/// One value per full window; empty when `values.len() < length`.
pub fn sma(values: &[Decimal], length: usize) -> Vec<Decimal> {
    if length == 0 || values.len() < length {
        return Vec::new();
    }

    let divisor = Decimal::from(length);
    values
        .windows(length)
        .map(|w| w.iter().sum::<Decimal>() / divisor)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sma_series() {
        let values = [dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];
        assert_eq!(sma(&values, 3), vec![dec!(2), dec!(3), dec!(4)]);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let values = [dec!(1), dec!(2)];
        assert!(sma(&values, 3).is_empty());
    }

    #[test]
    fn test_sma_zero_length() {
        assert!(sma(&[dec!(1)], 0).is_empty());
    }
}
