//! Assembly of a `TechnicalReading` from bar history

use confluence_core::{Bar, Price, TechnicalReading};
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use crate::{atr, rsi, sma, vwap};

/// Lookback lengths for each indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorLengths {
    pub rsi: usize,
    pub sma_short: usize,
    pub sma_long: usize,
    pub vwap: usize,
    pub atr: usize,
}

impl Default for IndicatorLengths {
    fn default() -> Self {
        Self {
            rsi: 14,
            sma_short: 20,
            sma_long: 50,
            vwap: 20,
            atr: 14,
        }
    }
}

impl IndicatorLengths {
    /// Fewest bars that yield a value for every indicator
    pub fn required_bars(&self) -> usize {
        [
            self.rsi + 1,
            self.sma_short,
            self.sma_long,
            self.vwap,
            self.atr + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        let named = [
            ("rsi", self.rsi),
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("vwap", self.vwap),
            ("atr", self.atr),
        ];
        if let Some((name, _)) = named.iter().find(|(_, len)| *len == 0) {
            return Err(IndicatorError::ZeroLength(*name));
        }
        if self.sma_short >= self.sma_long {
            return Err(IndicatorError::ShortNotBelowLong {
                short: self.sma_short,
                long: self.sma_long,
            });
        }
        Ok(())
    }
}

/// Compute the latest technical reading from bars (oldest first)
///
/// Returns `None` when the history is shorter than `min_history` or any
/// indicator has no current value.
pub fn compute_reading(
    bars: &[Bar],
    lengths: &IndicatorLengths,
    min_history: usize,
) -> Option<TechnicalReading> {
    if bars.len() < min_history {
        return None;
    }

    let closes: Vec<Price> = bars.iter().map(|b| b.close).collect();
    let current_price = *closes.last()?;

    Some(TechnicalReading {
        rsi: *rsi(&closes, lengths.rsi).last()?,
        sma_short: *sma(&closes, lengths.sma_short).last()?,
        sma_long: *sma(&closes, lengths.sma_long).last()?,
        vwap: *vwap(bars, lengths.vwap).last()?,
        atr: *atr(bars, lengths.atr).last()?,
        current_price,
        bars: bars.len(),
    })
}
