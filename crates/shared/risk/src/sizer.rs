//! Position Sizer
//!
//! Sizes every eligible candidate independently (map), then reduces the
//! capped weights into a normalized allocation. The only interval-global
//! inputs are the regime factor and the number of candidates.

use confluence_core::{AllocationVector, InstrumentId, Price, Ratio, Weight};
use log::{debug, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::{RiskConfigError, ScoreTier, SizingConfig, SizingPolicy};
use crate::normalize::normalize;
use crate::regime::Regime;

/// Why one instrument could not be sized this interval
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    #[error("No current price available")]
    MissingPrice,

    #[error("Non-positive price {0}")]
    NonPositivePrice(Price),

    #[error("No ATR reading available")]
    MissingVolatility,

    #[error("Negative ATR {0}")]
    NegativeVolatility(Price),

    #[error("Volatility ratio overflowed: ATR {atr} at price {price}")]
    VolatilityOverflow { atr: Price, price: Price },
}

/// An eligible instrument handed to the sizer
#[derive(Debug, Clone, PartialEq)]
pub struct SizingCandidate {
    pub instrument_id: InstrumentId,
    /// Gate score (used by score-tiered sizing)
    pub score: Decimal,
    /// Quality boost, 1 when none applies
    pub quality_multiplier: Decimal,
    pub current_price: Option<Price>,
    pub atr: Option<Price>,
}

impl SizingCandidate {
    pub fn new(instrument_id: impl Into<InstrumentId>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            score: Decimal::ZERO,
            quality_multiplier: Decimal::ONE,
            current_price: None,
            atr: None,
        }
    }

    pub fn with_score(mut self, score: Decimal) -> Self {
        self.score = score;
        self
    }

    pub fn with_quality_multiplier(mut self, multiplier: Decimal) -> Self {
        self.quality_multiplier = multiplier;
        self
    }

    pub fn with_volatility(mut self, current_price: Price, atr: Price) -> Self {
        self.current_price = Some(current_price);
        self.atr = Some(atr);
        self
    }
}

/// Sizing result for one instrument, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SizedPosition {
    /// Step 1 weight
    pub raw: Weight,
    /// After quality boost and cap
    pub capped: Weight,
}

/// Output of one sizing pass
#[derive(Debug, Clone, PartialEq)]
pub struct SizingReport {
    pub regime: Regime,
    /// max_position × regime factor
    pub effective_cap: Weight,
    pub outcomes: BTreeMap<InstrumentId, Result<SizedPosition, SizingError>>,
    pub allocation: AllocationVector,
}

impl SizingReport {
    /// Instruments that failed to size
    pub fn failures(&self) -> impl Iterator<Item = (&InstrumentId, &SizingError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.as_ref().err().map(|e| (id, e)))
    }
}

/// Sizes eligible instruments into a normalized allocation
#[derive(Debug, Clone)]
pub struct PositionSizer {
    config: SizingConfig,
}

impl PositionSizer {
    /// Create a sizer, rejecting invalid configuration up front
    pub fn new(config: SizingConfig) -> Result<Self, RiskConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Regime for the interval from the latest stress reading
    pub fn regime(&self, stress: Option<Ratio>) -> Regime {
        self.config
            .regime
            .as_ref()
            .map(|r| r.assess(stress))
            .unwrap_or(Regime::RiskOn)
    }

    /// Per-instrument cap for a regime
    pub fn effective_cap(&self, regime: Regime) -> Weight {
        let factor = self
            .config
            .regime
            .as_ref()
            .map(|r| r.factor(regime))
            .unwrap_or(Decimal::ONE);
        self.config.max_position * factor
    }

    /// Size all candidates for one interval
    ///
    /// Candidates must already be eligible; an empty slice yields an
    /// all-cash allocation.
    pub fn size(&self, candidates: &[SizingCandidate], stress: Option<Ratio>) -> SizingReport {
        let regime = self.regime(stress);
        let effective_cap = self.effective_cap(regime);
        let eligible = candidates.len();

        let outcomes: BTreeMap<InstrumentId, Result<SizedPosition, SizingError>> = candidates
            .par_iter()
            .map(|candidate| {
                let outcome = self.size_one(candidate, effective_cap, eligible);
                (candidate.instrument_id.clone(), outcome)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        let capped: BTreeMap<InstrumentId, Weight> = outcomes
            .iter()
            .filter_map(|(id, outcome)| match outcome {
                Ok(position) => {
                    debug!(
                        "Sized {}: raw={}, capped={}, cap={}",
                        id, position.raw, position.capped, effective_cap
                    );
                    Some((id.clone(), position.capped))
                }
                Err(e) => {
                    warn!("Sizing failed for {}, contributing zero weight: {}", id, e);
                    None
                }
            })
            .collect();

        SizingReport {
            regime,
            effective_cap,
            allocation: normalize(&capped),
            outcomes,
        }
    }

    /// Steps 1, 2 and 4 for a single instrument
    fn size_one(
        &self,
        candidate: &SizingCandidate,
        effective_cap: Weight,
        eligible: usize,
    ) -> Result<SizedPosition, SizingError> {
        let raw = match &self.config.policy {
            SizingPolicy::EqualWeight => Decimal::ONE / Decimal::from(eligible.max(1)),
            SizingPolicy::VolatilityAdjusted {
                sensitivity,
                damp_ceiling,
            } => {
                let ratio = volatility_ratio(candidate)?;
                // An overflowing product is far past any ceiling
                let damping = ratio
                    .checked_mul(*sensitivity)
                    .map_or(*damp_ceiling, |d| d.min(*damp_ceiling));
                effective_cap * (Decimal::ONE - damping)
            }
            SizingPolicy::ScoreTiered { tiers } => tier_weight(tiers, candidate.score),
        };

        let boosted = raw
            .checked_mul(candidate.quality_multiplier)
            .unwrap_or(effective_cap);
        let capped = boosted.max(Decimal::ZERO).min(effective_cap);

        Ok(SizedPosition { raw, capped })
    }
}

/// ATR / price with the division guarded
fn volatility_ratio(candidate: &SizingCandidate) -> Result<Ratio, SizingError> {
    let price = candidate.current_price.ok_or(SizingError::MissingPrice)?;
    if price <= Decimal::ZERO {
        return Err(SizingError::NonPositivePrice(price));
    }
    let atr = candidate.atr.ok_or(SizingError::MissingVolatility)?;
    if atr < Decimal::ZERO {
        return Err(SizingError::NegativeVolatility(atr));
    }
    atr.checked_div(price).ok_or(SizingError::VolatilityOverflow { atr, price })
}

/// Weight of the highest tier whose min_score the score reaches
fn tier_weight(tiers: &[ScoreTier], score: Decimal) -> Weight {
    tiers
        .iter()
        .filter(|t| score >= t.min_score)
        .max_by(|a, b| a.min_score.cmp(&b.min_score))
        .map(|t| t.weight)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regime::RegimeScaling;
    use rust_decimal_macros::dec;

    fn vol_sizer() -> PositionSizer {
        PositionSizer::new(SizingConfig::volatility_adjusted(dec!(0.25), dec!(10), dec!(0.5)))
            .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = PositionSizer::new(SizingConfig::equal_weight().with_max_position(dec!(-1)));
        assert!(result.is_err());
    }

    #[test]
    fn test_equal_weight_three_eligible() {
        let sizer = PositionSizer::new(SizingConfig::equal_weight()).unwrap();
        let candidates: Vec<SizingCandidate> = ["A", "B", "C"]
            .iter()
            .map(|id| SizingCandidate::new(*id))
            .collect();

        let report = sizer.size(&candidates, None);
        let third = Decimal::ONE / Decimal::from(3);

        assert_eq!(report.allocation.len(), 3);
        for id in ["A", "B", "C"] {
            assert_eq!(report.allocation.weight(&InstrumentId::new(id)), third);
        }
        assert!((Decimal::ONE - report.allocation.total()).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_volatility_sizing_scenario() {
        // ATR / price = 2 / 100 = 0.02; damping = min(0.2, 0.5) = 0.2
        let candidates = vec![SizingCandidate::new("A").with_volatility(dec!(100), dec!(2))];
        let report = vol_sizer().size(&candidates, None);

        assert_eq!(report.effective_cap, dec!(0.25));
        assert_eq!(report.allocation.weight(&InstrumentId::new("A")), dec!(0.20));
    }

    #[test]
    fn test_volatility_damping_hits_ceiling() {
        // ratio 0.1 × 10 = 1.0, capped at 0.5 → 0.25 × 0.5
        let candidates = vec![SizingCandidate::new("A").with_volatility(dec!(100), dec!(10))];
        let report = vol_sizer().size(&candidates, None);
        assert_eq!(report.allocation.weight(&InstrumentId::new("A")), dec!(0.125));
    }

    #[test]
    fn test_regime_scales_cap() {
        let config = SizingConfig::volatility_adjusted(dec!(0.25), dec!(10), dec!(0.5))
            .with_regime(RegimeScaling::new(dec!(0.35)));
        let sizer = PositionSizer::new(config).unwrap();

        let candidates = vec![
            SizingCandidate::new("A").with_volatility(dec!(100), dec!(0)),
            SizingCandidate::new("B").with_volatility(dec!(50), dec!(1)),
        ];
        let report = sizer.size(&candidates, Some(dec!(1.2)));

        assert_eq!(report.regime, Regime::RiskOff);
        assert_eq!(report.effective_cap, dec!(0.0875));
        for (_, weight) in report.allocation.iter() {
            assert!(*weight <= dec!(0.0875));
        }
        assert_eq!(report.allocation.weight(&InstrumentId::new("A")), dec!(0.0875));
    }

    #[test]
    fn test_quality_boost_is_capped() {
        // raw 0.20 × 1.5 = 0.30, clamped to 0.25
        let candidates = vec![
            SizingCandidate::new("A")
                .with_volatility(dec!(100), dec!(2))
                .with_quality_multiplier(dec!(1.5)),
        ];
        let report = vol_sizer().size(&candidates, None);

        let outcome = report.outcomes[&InstrumentId::new("A")].clone().unwrap();
        assert_eq!(outcome.raw, dec!(0.20));
        assert_eq!(outcome.capped, dec!(0.25));
    }

    #[test]
    fn test_zero_price_contributes_zero() {
        let candidates = vec![
            SizingCandidate::new("A").with_volatility(dec!(0), dec!(2)),
            SizingCandidate::new("B").with_volatility(dec!(100), dec!(2)),
        ];
        let report = vol_sizer().size(&candidates, None);

        assert!(!report.allocation.contains(&InstrumentId::new("A")));
        assert_eq!(report.allocation.weight(&InstrumentId::new("B")), dec!(0.20));
        assert_eq!(
            report.outcomes[&InstrumentId::new("A")],
            Err(SizingError::NonPositivePrice(dec!(0)))
        );
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_near_zero_price_contributes_zero() {
        let tiny = dec!(0.0000000000000000000000000001);
        let candidates = vec![
            SizingCandidate::new("A").with_volatility(tiny, dec!(1000000000)),
            SizingCandidate::new("B").with_volatility(dec!(100), dec!(2)),
        ];
        let report = vol_sizer().size(&candidates, None);

        assert!(!report.allocation.contains(&InstrumentId::new("A")));
        assert_eq!(report.allocation.weight(&InstrumentId::new("B")), dec!(0.20));
        assert_eq!(
            report.outcomes[&InstrumentId::new("A")],
            Err(SizingError::VolatilityOverflow {
                atr: dec!(1000000000),
                price: tiny
            })
        );
    }

    #[test]
    fn test_huge_ratio_damps_to_ceiling() {
        // ratio fits but ratio × sensitivity overflows
        let config = SizingConfig::volatility_adjusted(
            dec!(0.25),
            dec!(1000000000000000000000),
            dec!(0.5),
        );
        let sizer = PositionSizer::new(config).unwrap();
        let candidates = vec![
            SizingCandidate::new("A").with_volatility(dec!(0.0000000001), dec!(10000000000)),
        ];
        let report = sizer.size(&candidates, None);
        assert_eq!(report.allocation.weight(&InstrumentId::new("A")), dec!(0.125));
    }

    #[test]
    fn test_missing_atr_contributes_zero() {
        let mut candidate = SizingCandidate::new("A");
        candidate.current_price = Some(dec!(100));
        let report = vol_sizer().size(&[candidate], None);

        assert!(report.allocation.is_cash());
        assert_eq!(
            report.outcomes[&InstrumentId::new("A")],
            Err(SizingError::MissingVolatility)
        );
    }

    #[test]
    fn test_score_tiers() {
        let tiers = vec![
            ScoreTier::new(dec!(0), dec!(0.25)),
            ScoreTier::new(dec!(2), dec!(0.75)),
            ScoreTier::new(dec!(1), dec!(0.5)),
        ];
        assert_eq!(tier_weight(&tiers, dec!(2)), dec!(0.75));
        assert_eq!(tier_weight(&tiers, dec!(1.5)), dec!(0.5));
        assert_eq!(tier_weight(&tiers, dec!(0)), dec!(0.25));
        assert_eq!(tier_weight(&tiers, dec!(-1)), Decimal::ZERO);
    }

    #[test]
    fn test_over_allocation_is_normalized() {
        let sizer = PositionSizer::new(SizingConfig::score_tiered(
            dec!(0.75),
            vec![ScoreTier::new(dec!(0), dec!(0.75))],
        ))
        .unwrap();
        let candidates = vec![SizingCandidate::new("A"), SizingCandidate::new("B")];
        let report = sizer.size(&candidates, None);

        assert!(report.allocation.total() <= Decimal::ONE);
        assert_eq!(
            report.allocation.weight(&InstrumentId::new("A")),
            report.allocation.weight(&InstrumentId::new("B"))
        );
        assert!(report.allocation.weight(&InstrumentId::new("A")) < dec!(0.75));
    }

    #[test]
    fn test_empty_candidates_all_cash() {
        let report = vol_sizer().size(&[], Some(dec!(3)));
        assert!(report.allocation.is_cash());
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let candidates = vec![
            SizingCandidate::new("A").with_volatility(dec!(100), dec!(2)),
            SizingCandidate::new("B").with_volatility(dec!(37), dec!(1.3)),
        ];
        let sizer = vol_sizer();
        assert_eq!(sizer.size(&candidates, None), sizer.size(&candidates, None));
    }
}
