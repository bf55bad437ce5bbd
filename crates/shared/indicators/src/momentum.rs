//! Momentum indicators: RSI

use rust_decimal::Decimal;

/// Relative Strength Index series
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss over the
/// last `length` close-to-close changes (simple averages).
/// Needs `length + 1` closes for the first value.
pub fn rsi(closes: &[Decimal], length: usize) -> Vec<Decimal> {
    if length == 0 || closes.len() < length + 1 {
        return Vec::new();
    }

    let changes: Vec<Decimal> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let hundred = Decimal::ONE_HUNDRED;
    let divisor = Decimal::from(length);

    changes
        .windows(length)
        .map(|window| {
            let gain: Decimal = window.iter().filter(|c| c.is_sign_positive()).sum();
            let loss: Decimal = window
                .iter()
                .filter(|c| c.is_sign_negative())
                .map(|c| c.abs())
                .sum();
            let avg_gain = gain / divisor;
            let avg_loss = loss / divisor;

            if avg_loss.is_zero() {
                // flat window is neutral, all gains is maximal strength
                if avg_gain.is_zero() {
                    return Decimal::from(50);
                }
                return hundred;
            }

            // RS too large to represent is indistinguishable from no losses
            match avg_gain
                .checked_div(avg_loss)
                .and_then(|rs| rs.checked_add(Decimal::ONE))
            {
                Some(denominator) => hundred - hundred / denominator,
                None => hundred,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rsi_all_gains() {
        let closes: Vec<Decimal> = (1..=16).map(Decimal::from).collect();
        let series = rsi(&closes, 14);
        assert_eq!(series.len(), 2);
        assert_eq!(*series.last().unwrap(), dec!(100));
    }

    #[test]
    fn test_rsi_balanced() {
        // Alternating +1 / -1 changes: equal average gain and loss
        let closes = [dec!(10), dec!(11), dec!(10), dec!(11), dec!(10)];
        let series = rsi(&closes, 4);
        assert_eq!(series, vec![dec!(50)]);
    }

    #[test]
    fn test_rsi_known_value() {
        // gains 3, losses 1 over 4 changes → RS = 3 → RSI = 75
        let closes = [dec!(10), dec!(11), dec!(12), dec!(11), dec!(12)];
        let series = rsi(&closes, 4);
        assert_eq!(series, vec![dec!(75)]);
    }

    #[test]
    fn test_rsi_flat() {
        let closes = [dec!(10); 6];
        assert_eq!(rsi(&closes, 5), vec![dec!(50)]);
    }

    #[test]
    fn test_rsi_overflowing_strength_is_maximal() {
        // loss of 1e-10 against a gain of 1e20
        let closes = [
            dec!(0.0000000001),
            Decimal::ZERO,
            dec!(100000000000000000000),
        ];
        assert_eq!(rsi(&closes, 2), vec![dec!(100)]);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let closes = [dec!(10), dec!(11), dec!(12)];
        assert!(rsi(&closes, 3).is_empty());
    }
}
