//! Signal Gate Evaluator
//!
//! Decides, per instrument and interval, whether an instrument may receive
//! weight. Evaluation is pure: the verdict depends only on the instrument's
//! own snapshot and technical reading.

use confluence_core::{InstrumentId, SignalSnapshot, TechnicalReading};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::predicate::{Predicate, PredicateOutcome};

/// How predicate outcomes combine into a verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GateMode {
    /// Every predicate must hold
    Hard,
    /// Eligible iff the summed weight of holding predicates exceeds `threshold`
    Scored { threshold: Decimal },
}

fn default_weight() -> Decimal {
    Decimal::ONE
}

/// A predicate and its contribution to the gate score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPredicate {
    #[serde(flatten)]
    pub predicate: Predicate,
    #[serde(default = "default_weight")]
    pub weight: Decimal,
}

impl WeightedPredicate {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            weight: Decimal::ONE,
        }
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }
}

impl From<Predicate> for WeightedPredicate {
    fn from(predicate: Predicate) -> Self {
        Self::new(predicate)
    }
}

/// Gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(flatten)]
    pub mode: GateMode,
    pub predicates: Vec<WeightedPredicate>,
}

impl GateConfig {
    /// Conjunction of the given predicates
    pub fn hard(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            mode: GateMode::Hard,
            predicates: predicates.into_iter().map(WeightedPredicate::new).collect(),
        }
    }

    /// Weighted score compared against `threshold`
    pub fn scored(threshold: Decimal, predicates: Vec<WeightedPredicate>) -> Self {
        Self {
            mode: GateMode::Scored { threshold },
            predicates,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.predicates.is_empty() {
            return Err(Error::Config("gate has no predicates".to_string()));
        }

        for weighted in &self.predicates {
            if weighted.weight < Decimal::ZERO {
                return Err(Error::Config(format!(
                    "predicate '{}' has negative weight {}",
                    weighted.predicate, weighted.weight
                )));
            }
            if let Predicate::Within { low, high, .. } = &weighted.predicate
                && low > high
            {
                return Err(Error::Config(format!(
                    "predicate '{}' has an empty band",
                    weighted.predicate
                )));
            }
        }

        Ok(())
    }
}

/// Why an instrument was excluded this interval
#[derive(Debug, Clone, PartialEq)]
pub enum IneligibleReason {
    MissingSnapshot,
    MissingTechnical,
    InsufficientHistory { bars: usize, required: usize },
    /// Hard gate predicate whose input was absent
    MissingInput(String),
    /// Hard gate predicate that evaluated false
    PredicateFailed(String),
    ScoreBelowThreshold { score: Decimal, threshold: Decimal },
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::MissingSnapshot => write!(f, "no signal snapshot"),
            IneligibleReason::MissingTechnical => write!(f, "no technical reading"),
            IneligibleReason::InsufficientHistory { bars, required } => {
                write!(f, "insufficient history: {} bars, need {}", bars, required)
            }
            IneligibleReason::MissingInput(predicate) => {
                write!(f, "missing input for '{}'", predicate)
            }
            IneligibleReason::PredicateFailed(predicate) => write!(f, "'{}' failed", predicate),
            IneligibleReason::ScoreBelowThreshold { score, threshold } => {
                write!(f, "score {} not above threshold {}", score, threshold)
            }
        }
    }
}

/// Outcome of gating one instrument
#[derive(Debug, Clone, PartialEq)]
pub enum GateVerdict {
    Eligible { score: Decimal },
    Ineligible(IneligibleReason),
}

impl GateVerdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, GateVerdict::Eligible { .. })
    }

    pub fn score(&self) -> Option<Decimal> {
        match self {
            GateVerdict::Eligible { score } => Some(*score),
            GateVerdict::Ineligible(_) => None,
        }
    }
}

/// Applies a [`GateConfig`] to instrument inputs
#[derive(Debug, Clone)]
pub struct GateEvaluator {
    config: GateConfig,
    min_history_bars: usize,
}

impl GateEvaluator {
    pub fn new(config: GateConfig, min_history_bars: usize) -> Self {
        Self {
            config,
            min_history_bars,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        instrument_id: &InstrumentId,
        snapshot: Option<&SignalSnapshot>,
        technical: Option<&TechnicalReading>,
    ) -> GateVerdict {
        let verdict = self.verdict(snapshot, technical);
        debug!("Gate {}: {:?}", instrument_id, verdict);
        verdict
    }

    fn verdict(
        &self,
        snapshot: Option<&SignalSnapshot>,
        technical: Option<&TechnicalReading>,
    ) -> GateVerdict {
        let Some(snapshot) = snapshot else {
            return GateVerdict::Ineligible(IneligibleReason::MissingSnapshot);
        };
        let Some(technical) = technical else {
            return GateVerdict::Ineligible(IneligibleReason::MissingTechnical);
        };
        if !technical.has_history(self.min_history_bars) {
            return GateVerdict::Ineligible(IneligibleReason::InsufficientHistory {
                bars: technical.bars,
                required: self.min_history_bars,
            });
        }

        match &self.config.mode {
            GateMode::Hard => {
                let mut score = Decimal::ZERO;
                for weighted in &self.config.predicates {
                    match weighted.predicate.evaluate(snapshot, Some(technical)) {
                        PredicateOutcome::Holds => score += weighted.weight,
                        PredicateOutcome::Fails => {
                            return GateVerdict::Ineligible(IneligibleReason::PredicateFailed(
                                weighted.predicate.to_string(),
                            ));
                        }
                        PredicateOutcome::Missing => {
                            return GateVerdict::Ineligible(IneligibleReason::MissingInput(
                                weighted.predicate.to_string(),
                            ));
                        }
                    }
                }
                GateVerdict::Eligible { score }
            }
            GateMode::Scored { threshold } => {
                let score: Decimal = self
                    .config
                    .predicates
                    .iter()
                    .filter(|w| w.predicate.evaluate(snapshot, Some(technical)).holds())
                    .map(|w| w.weight)
                    .sum();

                if score > *threshold {
                    GateVerdict::Eligible { score }
                } else {
                    GateVerdict::Ineligible(IneligibleReason::ScoreBelowThreshold {
                        score,
                        threshold: *threshold,
                    })
                }
            }
        }
    }
}
