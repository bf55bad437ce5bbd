use serde::{Deserialize, Serialize};

use super::insider::InsiderTransaction;
use super::records::{FundamentalRatios, OwnershipRecord, SentimentRecord};
use crate::values::Ratio;

/// Latest observed signal values for one instrument in one interval
///
/// Every category is optional: an absent provider record stays `None`
/// and is never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    #[serde(default)]
    pub insider_recent_buy: Option<bool>,
    #[serde(default)]
    pub institutional_ownership_pct: Option<Ratio>,
    #[serde(default)]
    pub social_sentiment_avg: Option<Ratio>,
    #[serde(default)]
    pub debt_equity_ratio: Option<Ratio>,
    #[serde(default)]
    pub return_on_equity: Option<Ratio>,
    /// Macro stress index; 0 is the calm regime
    #[serde(default)]
    pub market_stress: Option<Ratio>,
}

impl SignalSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold insider filings into the recent-buy flag
    ///
    /// Looks at the `lookback` most recent filings: `Some(true)` if any is a
    /// buy, `Some(false)` if none is, `None` when there is nothing to look at.
    pub fn with_insider_transactions(
        mut self,
        transactions: &[InsiderTransaction],
        lookback: usize,
    ) -> Self {
        let mut ordered: Vec<&InsiderTransaction> = transactions.iter().collect();
        ordered.sort_by_key(|t| t.filed_at);
        let start = ordered.len().saturating_sub(lookback);
        let window = &ordered[start..];

        self.insider_recent_buy = if window.is_empty() {
            None
        } else {
            Some(window.iter().any(|t| t.is_buy()))
        };
        self
    }

    pub fn with_ownership(mut self, record: Option<&OwnershipRecord>) -> Self {
        self.institutional_ownership_pct = record.map(|r| r.ownership_pct);
        self
    }

    pub fn with_sentiment(mut self, record: Option<&SentimentRecord>) -> Self {
        self.social_sentiment_avg = record.and_then(|r| r.average());
        self
    }

    pub fn with_ratios(mut self, record: Option<&FundamentalRatios>) -> Self {
        self.debt_equity_ratio = record.and_then(|r| r.debt_equity_ratio);
        self.return_on_equity = record.and_then(|r| r.return_on_equity);
        self
    }

    pub fn with_market_stress(mut self, stress: Option<Ratio>) -> Self {
        self.market_stress = stress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn filings(kinds: &[&str]) -> Vec<InsiderTransaction> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        kinds
            .iter()
            .enumerate()
            .map(|(i, k)| InsiderTransaction::new(start + Duration::days(i as i64), *k))
            .collect()
    }

    #[test]
    fn test_recent_buy_within_lookback() {
        let txs = filings(&["Sell", "Sell", "Buy", "Sell"]);
        let snapshot = SignalSnapshot::new().with_insider_transactions(&txs, 5);
        assert_eq!(snapshot.insider_recent_buy, Some(true));
    }

    #[test]
    fn test_buy_outside_lookback_is_ignored() {
        let txs = filings(&["Buy", "Sell", "Sell", "Sell", "Sell", "Sell"]);
        let snapshot = SignalSnapshot::new().with_insider_transactions(&txs, 5);
        assert_eq!(snapshot.insider_recent_buy, Some(false));
    }

    #[test]
    fn test_lookback_uses_filing_time_not_input_order() {
        let mut txs = filings(&["Sell", "Sell", "Buy"]);
        // Move the buy to the oldest position
        txs[2].filed_at = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let snapshot = SignalSnapshot::new().with_insider_transactions(&txs, 2);
        assert_eq!(snapshot.insider_recent_buy, Some(false));
    }

    #[test]
    fn test_no_filings_is_missing() {
        let snapshot = SignalSnapshot::new().with_insider_transactions(&[], 5);
        assert_eq!(snapshot.insider_recent_buy, None);
    }

    #[test]
    fn test_absent_ratios_stay_missing() {
        let snapshot = SignalSnapshot::new().with_ratios(None);
        assert_eq!(snapshot.debt_equity_ratio, None);
        assert_eq!(snapshot.return_on_equity, None);
    }

    #[test]
    fn test_partial_ratios() {
        let ratios = FundamentalRatios {
            as_of: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            debt_equity_ratio: Some(dec!(0.7)),
            return_on_equity: None,
        };
        let snapshot = SignalSnapshot::new().with_ratios(Some(&ratios));
        assert_eq!(snapshot.debt_equity_ratio, Some(dec!(0.7)));
        assert_eq!(snapshot.return_on_equity, None);
    }
}
