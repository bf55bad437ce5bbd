//! In-memory market data
//!
//! Backs both provider ports with records loaded from a single JSON file.
//! Every query is point-in-time: records stamped after `as_of` are
//! invisible.

use confluence_core::{
    AllocationVector, Bar, FundamentalRatios, InsiderTransaction, InstrumentId, OwnershipRecord,
    Ratio, SentimentRecord, Timestamp,
};
use confluence_ports::{AllocationSink, BarSource, ProviderError, ProviderResult, SignalProvider};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{Result, RunnerError};

/// All recorded data for one instrument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentData {
    pub bars: Vec<Bar>,
    pub insider_transactions: Vec<InsiderTransaction>,
    pub ownership: Vec<OwnershipRecord>,
    pub sentiment: Vec<SentimentRecord>,
    pub ratios: Vec<FundamentalRatios>,
}

/// One reading of the macro stress index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReading {
    pub as_of: Timestamp,
    pub level: Ratio,
}

/// Serialized form of a market data file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketDataSet {
    #[serde(default)]
    pub instruments: BTreeMap<InstrumentId, InstrumentData>,
    #[serde(default)]
    pub market_stress: Vec<StressReading>,
}

impl MarketDataSet {
    /// Load market data from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| RunnerError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RunnerError::Parse(e.to_string()))
    }

    /// Timestamp of the most recent bar across all instruments
    pub fn latest_bar_time(&self) -> Option<Timestamp> {
        self.instruments
            .values()
            .flat_map(|data| data.bars.iter().map(|b| b.timestamp))
            .max()
    }
}

/// Latest record stamped at or before `as_of`
fn latest<T>(records: &[T], as_of: Timestamp, stamp: impl Fn(&T) -> Timestamp) -> Option<T>
where
    T: Clone,
{
    records
        .iter()
        .filter(|r| stamp(*r) <= as_of)
        .max_by_key(|r| stamp(*r))
        .cloned()
}

/// Point-in-time view over a [`MarketDataSet`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarket {
    data: MarketDataSet,
    outages: BTreeSet<InstrumentId>,
}

impl InMemoryMarket {
    pub fn new(data: MarketDataSet) -> Self {
        Self {
            data,
            outages: BTreeSet::new(),
        }
    }

    /// Make every query for `instrument_id` fail as unavailable
    pub fn with_outage(mut self, instrument_id: impl Into<InstrumentId>) -> Self {
        self.outages.insert(instrument_id.into());
        self
    }

    pub fn data(&self) -> &MarketDataSet {
        &self.data
    }

    fn instrument(&self, instrument_id: &InstrumentId) -> ProviderResult<&InstrumentData> {
        if self.outages.contains(instrument_id) {
            return Err(ProviderError::Unavailable(format!(
                "feed down for {}",
                instrument_id
            )));
        }
        self.data
            .instruments
            .get(instrument_id)
            .ok_or_else(|| ProviderError::UnknownInstrument(instrument_id.to_string()))
    }
}

impl SignalProvider for InMemoryMarket {
    fn insider_transactions(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Vec<InsiderTransaction>> {
        let mut filings: Vec<InsiderTransaction> = self
            .instrument(instrument_id)?
            .insider_transactions
            .iter()
            .filter(|t| t.filed_at <= as_of)
            .cloned()
            .collect();
        filings.sort_by_key(|t| t.filed_at);
        Ok(filings)
    }

    fn institutional_ownership(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Option<OwnershipRecord>> {
        let data = self.instrument(instrument_id)?;
        Ok(latest(&data.ownership, as_of, |r| r.as_of))
    }

    fn social_sentiment(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Option<SentimentRecord>> {
        let data = self.instrument(instrument_id)?;
        Ok(latest(&data.sentiment, as_of, |r| r.as_of))
    }

    fn fundamental_ratios(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Option<FundamentalRatios>> {
        let data = self.instrument(instrument_id)?;
        Ok(latest(&data.ratios, as_of, |r| r.as_of))
    }

    fn market_stress(&self, as_of: Timestamp) -> ProviderResult<Option<Ratio>> {
        Ok(latest(&self.data.market_stress, as_of, |r| r.as_of).map(|r| r.level))
    }

    fn name(&self) -> &str {
        "InMemoryMarket"
    }
}

impl BarSource for InMemoryMarket {
    fn history(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
        max_bars: usize,
    ) -> ProviderResult<Vec<Bar>> {
        let mut bars: Vec<Bar> = self
            .instrument(instrument_id)?
            .bars
            .iter()
            .filter(|b| b.timestamp <= as_of)
            .cloned()
            .collect();
        bars.sort_by_key(|b| b.timestamp);
        let start = bars.len().saturating_sub(max_bars);
        let window = bars.split_off(start);

        if let Some(bad) = window.iter().find(|b| b.high < b.low) {
            return Err(ProviderError::MalformedRecord {
                instrument: instrument_id.to_string(),
                reason: format!(
                    "bar at {} has high {} below low {}",
                    bad.timestamp, bad.high, bad.low
                ),
            });
        }
        Ok(window)
    }
}

/// Sink that keeps every submitted allocation
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    submissions: Vec<(Timestamp, AllocationVector)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> &[(Timestamp, AllocationVector)] {
        &self.submissions
    }

    pub fn last(&self) -> Option<&AllocationVector> {
        self.submissions.last().map(|(_, v)| v)
    }
}

impl AllocationSink for RecordingSink {
    fn submit(&mut self, as_of: Timestamp, allocation: AllocationVector) {
        self.submissions.push((as_of, allocation));
    }
}
