//! Strategy configuration
//!
//! Everything that distinguishes one strategy variant from another lives in
//! a [`StrategyConfig`]: the universe, indicator lookbacks, the gate, the
//! sizing policy and the optional quality boost. Configurations are loaded
//! from JSON and validated once, before the first interval.

use chrono::Duration;
use confluence_core::InstrumentId;
use confluence_indicators::{IndicatorError, IndicatorLengths};
use confluence_risk::SizingConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::gate::GateConfig;
use crate::predicate::Predicate;

/// Rebalancing cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "4hour")]
    FourHours,
    #[default]
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
}

impl Interval {
    pub fn duration(self) -> Duration {
        match self {
            Interval::OneMinute => Duration::minutes(1),
            Interval::FiveMinutes => Duration::minutes(5),
            Interval::FifteenMinutes => Duration::minutes(15),
            Interval::OneHour => Duration::hours(1),
            Interval::FourHours => Duration::hours(4),
            Interval::OneDay => Duration::days(1),
            Interval::OneWeek => Duration::weeks(1),
        }
    }
}

/// Multiplies the raw weight of eligible instruments satisfying `predicate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBoost {
    pub predicate: Predicate,
    /// Must be greater than 1
    pub multiplier: Decimal,
}

impl QualityBoost {
    pub fn new(predicate: Predicate, multiplier: Decimal) -> Self {
        Self {
            predicate,
            multiplier,
        }
    }
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_min_history_bars() -> usize {
    50
}

fn default_insider_lookback() -> usize {
    5
}

/// Complete configuration of one strategy run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default = "default_name")]
    pub name: String,

    pub universe: Vec<InstrumentId>,

    #[serde(default)]
    pub interval: Interval,

    /// Technical readings backed by fewer bars are treated as unavailable
    #[serde(default = "default_min_history_bars")]
    pub min_history_bars: usize,

    #[serde(default)]
    pub indicators: IndicatorLengths,

    /// Number of most recent insider filings considered
    #[serde(default = "default_insider_lookback")]
    pub insider_lookback: usize,

    pub gate: GateConfig,

    #[serde(default)]
    pub sizing: SizingConfig,

    #[serde(default)]
    pub quality: Option<QualityBoost>,
}

impl StrategyConfig {
    pub fn new(
        name: impl Into<String>,
        universe: impl IntoIterator<Item = impl Into<InstrumentId>>,
        gate: GateConfig,
        sizing: SizingConfig,
    ) -> Self {
        Self {
            name: name.into(),
            universe: universe.into_iter().map(Into::into).collect(),
            interval: Interval::default(),
            min_history_bars: default_min_history_bars(),
            indicators: IndicatorLengths::default(),
            insider_lookback: default_insider_lookback(),
            gate,
            sizing,
            quality: None,
        }
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_min_history_bars(mut self, bars: usize) -> Self {
        self.min_history_bars = bars;
        self
    }

    pub fn with_insider_lookback(mut self, filings: usize) -> Self {
        self.insider_lookback = filings;
        self
    }

    pub fn with_indicators(mut self, indicators: IndicatorLengths) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn with_quality(mut self, quality: QualityBoost) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.universe.is_empty() {
            return Err(Error::Config("universe is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for id in &self.universe {
            if !seen.insert(id) {
                return Err(Error::DuplicateInstrument(id.to_string()));
            }
        }

        self.indicators.validate()?;
        let required = self.indicators.required_bars();
        if self.min_history_bars < required {
            return Err(IndicatorError::HistoryTooShort {
                min_history: self.min_history_bars,
                required,
            }
            .into());
        }

        if self.insider_lookback == 0 {
            return Err(Error::Config("insider_lookback must be positive".to_string()));
        }

        self.gate.validate()?;
        self.sizing.validate()?;

        if let Some(quality) = &self.quality
            && quality.multiplier <= Decimal::ONE
        {
            return Err(Error::Config(format!(
                "quality multiplier must be greater than 1, got {}",
                quality.multiplier
            )));
        }

        Ok(())
    }
}
