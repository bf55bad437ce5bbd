//! Signal-provider records consumed once per interval

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::values::{Ratio, Timestamp};

/// Institutional-ownership snapshot for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub as_of: Timestamp,
    /// Percentage of shares held by institutions, 0..=100
    pub ownership_pct: Ratio,
}

/// Social-sentiment record with one or more named sub-scores
/// (e.g. `twitter`, `stocktwits`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub as_of: Timestamp,
    #[serde(default)]
    pub sub_scores: BTreeMap<String, Ratio>,
}

impl SentimentRecord {
    pub fn new(as_of: Timestamp) -> Self {
        Self {
            as_of,
            sub_scores: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, source: impl Into<String>, score: Ratio) -> Self {
        self.sub_scores.insert(source.into(), score);
        self
    }

    /// Mean of all sub-scores, `None` if the record carries none
    pub fn average(&self) -> Option<Ratio> {
        if self.sub_scores.is_empty() {
            return None;
        }
        let sum: Decimal = self.sub_scores.values().sum();
        Some(sum / Decimal::from(self.sub_scores.len()))
    }
}

/// Fundamental ratios; either field may be absent in the upstream feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRatios {
    pub as_of: Timestamp,
    #[serde(default)]
    pub debt_equity_ratio: Option<Ratio>,
    /// Representation (fraction vs percent) follows the provider
    #[serde(default)]
    pub return_on_equity: Option<Ratio>,
}
