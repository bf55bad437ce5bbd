//! Allocation Engine
//!
//! One rebalance runs in two phases:
//!
//! ```text
//!   universe ──par_iter──► gate + candidate (per instrument, independent)
//!                                 │
//!                                 ▼
//!            regime ──► PositionSizer::size ──► normalized AllocationVector
//! ```
//!
//! Nothing is retained between calls; the same `MarketSnapshot` always
//! yields the same report.

use confluence_core::{
    AllocationVector, InstrumentId, Ratio, SignalSnapshot, TechnicalReading, Timestamp, Weight,
};
use confluence_risk::{PositionSizer, Regime, SizedPosition, SizingCandidate, SizingError};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::config::StrategyConfig;
use crate::error::Result;
use crate::gate::{GateEvaluator, GateVerdict};

/// Inputs gathered for one instrument in one interval
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentInputs {
    pub snapshot: Option<SignalSnapshot>,
    pub technical: Option<TechnicalReading>,
}

impl InstrumentInputs {
    pub fn new(snapshot: Option<SignalSnapshot>, technical: Option<TechnicalReading>) -> Self {
        Self {
            snapshot,
            technical,
        }
    }
}

/// Everything the engine sees for one interval
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub as_of: Timestamp,
    /// Latest macro stress reading; `None` is treated as calm
    pub market_stress: Option<Ratio>,
    pub instruments: BTreeMap<InstrumentId, InstrumentInputs>,
}

impl MarketSnapshot {
    pub fn new(as_of: Timestamp) -> Self {
        Self {
            as_of,
            market_stress: None,
            instruments: BTreeMap::new(),
        }
    }

    pub fn with_market_stress(mut self, stress: Option<Ratio>) -> Self {
        self.market_stress = stress;
        self
    }

    pub fn with_instrument(
        mut self,
        instrument_id: impl Into<InstrumentId>,
        inputs: InstrumentInputs,
    ) -> Self {
        self.instruments.insert(instrument_id.into(), inputs);
        self
    }
}

/// What happened to one instrument during a rebalance
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentOutcome {
    pub verdict: GateVerdict,
    pub quality_boosted: bool,
    /// `None` for ineligible instruments
    pub sizing: Option<std::result::Result<SizedPosition, SizingError>>,
    /// Final normalized weight
    pub weight: Weight,
}

/// Result of one rebalance
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceReport {
    pub as_of: Timestamp,
    pub allocation: AllocationVector,
    pub outcomes: BTreeMap<InstrumentId, InstrumentOutcome>,
    pub regime: Regime,
    pub effective_cap: Weight,
}

impl RebalanceReport {
    pub fn eligible(&self) -> impl Iterator<Item = &InstrumentId> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.verdict.is_eligible())
            .map(|(id, _)| id)
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible().count()
    }
}

/// Gate result and sizing input for one instrument
struct Gated {
    instrument_id: InstrumentId,
    verdict: GateVerdict,
    quality_boosted: bool,
    candidate: Option<SizingCandidate>,
}

/// Turns interval inputs into a target allocation
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    config: StrategyConfig,
    gate: GateEvaluator,
    sizer: PositionSizer,
}

impl AllocationEngine {
    /// Validate `config` and build the engine
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        let sizer = PositionSizer::new(config.sizing.clone())?;
        let gate = GateEvaluator::new(config.gate.clone(), config.min_history_bars);

        Ok(Self {
            config,
            gate,
            sizer,
        })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Compute the target allocation for one interval
    ///
    /// Instruments outside the configured universe are ignored; universe
    /// instruments absent from `market` are ineligible.
    pub fn rebalance(&self, market: &MarketSnapshot) -> RebalanceReport {
        let gated: Vec<Gated> = self
            .config
            .universe
            .par_iter()
            .map(|id| self.gate_one(id, market.instruments.get(id)))
            .collect();

        let candidates: Vec<SizingCandidate> =
            gated.iter().filter_map(|g| g.candidate.clone()).collect();
        let mut sizing = self.sizer.size(&candidates, market.market_stress);

        let outcomes: BTreeMap<InstrumentId, InstrumentOutcome> = gated
            .into_iter()
            .map(|g| {
                let weight = sizing.allocation.weight(&g.instrument_id);
                let outcome = InstrumentOutcome {
                    sizing: sizing.outcomes.remove(&g.instrument_id),
                    verdict: g.verdict,
                    quality_boosted: g.quality_boosted,
                    weight,
                };
                (g.instrument_id, outcome)
            })
            .collect();

        let report = RebalanceReport {
            as_of: market.as_of,
            allocation: sizing.allocation,
            outcomes,
            regime: sizing.regime,
            effective_cap: sizing.effective_cap,
        };

        info!(
            "[{}] Rebalance at {}: {}/{} eligible, regime={:?}, cap={}, invested={}",
            self.config.name,
            report.as_of,
            report.eligible_count(),
            self.config.universe.len(),
            report.regime,
            report.effective_cap,
            report.allocation.total()
        );

        report
    }

    fn gate_one(&self, id: &InstrumentId, inputs: Option<&InstrumentInputs>) -> Gated {
        let snapshot = inputs.and_then(|i| i.snapshot.as_ref());
        let technical = inputs.and_then(|i| i.technical.as_ref());
        let verdict = self.gate.evaluate(id, snapshot, technical);

        let Some(score) = verdict.score() else {
            return Gated {
                instrument_id: id.clone(),
                verdict,
                quality_boosted: false,
                candidate: None,
            };
        };

        let mut candidate = SizingCandidate::new(id.clone()).with_score(score);

        let boost = match (&self.config.quality, snapshot) {
            (Some(quality), Some(snapshot))
                if quality.predicate.evaluate(snapshot, technical).holds() =>
            {
                Some(quality.multiplier)
            }
            _ => None,
        };
        if let Some(multiplier) = boost {
            debug!("Quality boost x{} for {}", multiplier, id);
            candidate = candidate.with_quality_multiplier(multiplier);
        }

        if let Some(t) = technical {
            candidate = candidate.with_volatility(t.current_price, t.atr);
        }

        Gated {
            instrument_id: id.clone(),
            verdict,
            quality_boosted: boost.is_some(),
            candidate: Some(candidate),
        }
    }
}
