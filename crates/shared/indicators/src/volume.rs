//! Volume indicators: VWAP

use confluence_core::{Bar, Price};
use rust_decimal::Decimal;

/// Rolling volume-weighted average (typical) price series
///
/// A window with no traded volume falls back to the plain mean of the
/// typical prices. When price × volume overflows, each typical price is
/// weighted by its share of the window volume instead.
pub fn vwap(bars: &[Bar], length: usize) -> Vec<Price> {
    if length == 0 || bars.len() < length {
        return Vec::new();
    }

    bars.windows(length)
        .map(|window| {
            let volume: Decimal = window.iter().map(|b| b.volume).sum();
            if volume.is_zero() {
                let sum: Decimal = window.iter().map(Bar::typical_price).sum();
                return sum / Decimal::from(length);
            }
            let notional = window.iter().try_fold(Decimal::ZERO, |acc, b| {
                b.typical_price()
                    .checked_mul(b.volume)
                    .and_then(|n| acc.checked_add(n))
            });
            match notional.and_then(|n| n.checked_div(volume)) {
                Some(price) => price,
                None => window
                    .iter()
                    .map(|b| b.typical_price() * (b.volume / volume))
                    .sum(),
            }
        })
        .collect()
}
