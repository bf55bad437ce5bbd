//! Rebalancing harness
//!
//! Gathers provider data for every universe instrument, hands the interval
//! snapshot to the engine and forwards the resulting allocation to a sink.
//! Provider failures degrade to missing data; they never abort an interval.

use confluence_core::{InstrumentId, Ratio, SignalSnapshot, TechnicalReading, Timestamp};
use confluence_indicators::compute_reading;
use confluence_ports::{AllocationSink, BarSource, ProviderResult, SignalProvider};
use confluence_strategy::{AllocationEngine, InstrumentInputs, MarketSnapshot, RebalanceReport};
use log::{debug, info, warn};

/// Drives one [`AllocationEngine`] against a signal provider and bar source
pub struct RebalanceHarness<P: SignalProvider, B: BarSource> {
    engine: AllocationEngine,
    signals: P,
    bars: B,
}

impl<P: SignalProvider, B: BarSource> RebalanceHarness<P, B> {
    pub fn new(engine: AllocationEngine, signals: P, bars: B) -> Self {
        Self {
            engine,
            signals,
            bars,
        }
    }

    pub fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    /// Collect every input the engine needs for `as_of`
    pub fn gather(&self, as_of: Timestamp) -> MarketSnapshot {
        let stress = self
            .fetch("market stress", "universe", self.signals.market_stress(as_of))
            .flatten();

        let mut market = MarketSnapshot::new(as_of).with_market_stress(stress);
        for id in &self.engine.config().universe {
            let inputs = InstrumentInputs::new(
                self.snapshot_for(id, as_of, stress),
                self.technical_for(id, as_of),
            );
            market.instruments.insert(id.clone(), inputs);
        }
        market
    }

    /// Run a single interval and submit its allocation
    pub fn run_once(&self, as_of: Timestamp, sink: &mut impl AllocationSink) -> RebalanceReport {
        let market = self.gather(as_of);
        let report = self.engine.rebalance(&market);
        sink.submit(as_of, report.allocation.clone());
        report
    }

    /// Run every interval from `start` through `end` inclusive
    pub fn run_schedule(
        &self,
        start: Timestamp,
        end: Timestamp,
        sink: &mut impl AllocationSink,
    ) -> Vec<RebalanceReport> {
        let step = self.engine.config().interval.duration();
        let mut reports = Vec::new();
        let mut as_of = start;

        while as_of <= end {
            reports.push(self.run_once(as_of, sink));
            as_of += step;
        }

        info!(
            "[{}] Schedule complete: {} intervals from {} to {}",
            self.engine.config().name,
            reports.len(),
            start,
            end
        );
        reports
    }

    /// `None` only when every signal feed failed for the instrument
    fn snapshot_for(
        &self,
        id: &InstrumentId,
        as_of: Timestamp,
        stress: Option<Ratio>,
    ) -> Option<SignalSnapshot> {
        let key = id.as_str();
        let signals = &self.signals;
        let insider = self.fetch("insider", key, signals.insider_transactions(id, as_of));
        let ownership = self.fetch("ownership", key, signals.institutional_ownership(id, as_of));
        let sentiment = self.fetch("sentiment", key, signals.social_sentiment(id, as_of));
        let ratios = self.fetch("ratios", key, signals.fundamental_ratios(id, as_of));

        if insider.is_none() && ownership.is_none() && sentiment.is_none() && ratios.is_none() {
            warn!("No signal data for {} at {}", id, as_of);
            return None;
        }

        let snapshot = SignalSnapshot::new()
            .with_insider_transactions(
                insider.as_deref().unwrap_or_default(),
                self.engine.config().insider_lookback,
            )
            .with_ownership(ownership.flatten().as_ref())
            .with_sentiment(sentiment.flatten().as_ref())
            .with_ratios(ratios.flatten().as_ref())
            .with_market_stress(stress);

        debug!("Snapshot {}: {:?}", id, snapshot);
        Some(snapshot)
    }

    fn technical_for(
        &self,
        id: &InstrumentId,
        as_of: Timestamp,
    ) -> Option<TechnicalReading> {
        let config = self.engine.config();
        let wanted = config.indicators.required_bars().max(config.min_history_bars);
        let bars = self.fetch("bars", id.as_str(), self.bars.history(id, as_of, wanted))?;

        // History length is checked by the gate so the reason is reported
        let reading = compute_reading(&bars, &config.indicators, 0);
        if reading.is_none() {
            debug!("No technical reading for {} ({} bars)", id, bars.len());
        }
        reading
    }

    fn fetch<T>(&self, what: &str, key: &str, result: ProviderResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    "[{}] {} for {} unavailable, treating as missing: {}",
                    self.signals.name(),
                    what,
                    key,
                    e
                );
                None
            }
        }
    }
}
