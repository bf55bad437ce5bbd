//! Threshold predicates over a signal snapshot and technical reading
//!
//! A predicate never fails loudly: a comparison against a missing value
//! yields [`PredicateOutcome::Missing`], which every gate mode treats as
//! "does not hold".

use confluence_core::{Ratio, SignalSnapshot, TechnicalReading};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric signal a predicate can compare against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    InstitutionalOwnership,
    SocialSentiment,
    DebtEquity,
    ReturnOnEquity,
    MarketStress,
    Rsi,
    /// ATR / current price
    VolatilityRatio,
}

impl Factor {
    /// Current value of the factor, if observed
    pub fn value(
        self,
        snapshot: &SignalSnapshot,
        technical: Option<&TechnicalReading>,
    ) -> Option<Ratio> {
        match self {
            Factor::InstitutionalOwnership => snapshot.institutional_ownership_pct,
            Factor::SocialSentiment => snapshot.social_sentiment_avg,
            Factor::DebtEquity => snapshot.debt_equity_ratio,
            Factor::ReturnOnEquity => snapshot.return_on_equity,
            Factor::MarketStress => snapshot.market_stress,
            Factor::Rsi => technical.map(|t| t.rsi),
            Factor::VolatilityRatio => technical.and_then(TechnicalReading::volatility_ratio),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Factor::InstitutionalOwnership => "institutional_ownership",
            Factor::SocialSentiment => "social_sentiment",
            Factor::DebtEquity => "debt_equity",
            Factor::ReturnOnEquity => "return_on_equity",
            Factor::MarketStress => "market_stress",
            Factor::Rsi => "rsi",
            Factor::VolatilityRatio => "volatility_ratio",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison against a threshold; inclusivity is explicit in the name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// value > threshold
    Above,
    /// value >= threshold
    AtLeast,
    /// value < threshold
    Below,
    /// value <= threshold
    AtMost,
}

impl Comparison {
    pub fn holds(self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Comparison::Above => value > threshold,
            Comparison::AtLeast => value >= threshold,
            Comparison::Below => value < threshold,
            Comparison::AtMost => value <= threshold,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Above => ">",
            Comparison::AtLeast => ">=",
            Comparison::Below => "<",
            Comparison::AtMost => "<=",
        }
    }
}

/// Result of evaluating one predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateOutcome {
    Holds,
    Fails,
    /// A required input was absent
    Missing,
}

impl PredicateOutcome {
    fn from_bool(holds: bool) -> Self {
        if holds {
            PredicateOutcome::Holds
        } else {
            PredicateOutcome::Fails
        }
    }

    pub fn holds(self) -> bool {
        self == PredicateOutcome::Holds
    }
}

/// An independently configurable eligibility condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Any insider buy among the recent filings
    InsiderRecentBuy,
    /// `factor <comparison> value`
    Compare {
        factor: Factor,
        comparison: Comparison,
        value: Decimal,
    },
    /// Inclusive band `low <= factor <= high`
    Within {
        factor: Factor,
        low: Decimal,
        high: Decimal,
    },
    /// Short SMA strictly above long SMA
    TrendUp,
    /// Current price strictly above VWAP
    PriceAboveVwap,
}

impl Predicate {
    pub fn compare(factor: Factor, comparison: Comparison, value: Decimal) -> Self {
        Predicate::Compare {
            factor,
            comparison,
            value,
        }
    }

    pub fn above(factor: Factor, value: Decimal) -> Self {
        Self::compare(factor, Comparison::Above, value)
    }

    pub fn below(factor: Factor, value: Decimal) -> Self {
        Self::compare(factor, Comparison::Below, value)
    }

    pub fn within(factor: Factor, low: Decimal, high: Decimal) -> Self {
        Predicate::Within { factor, low, high }
    }

    /// Evaluate against one instrument's inputs
    pub fn evaluate(
        &self,
        snapshot: &SignalSnapshot,
        technical: Option<&TechnicalReading>,
    ) -> PredicateOutcome {
        match self {
            Predicate::InsiderRecentBuy => match snapshot.insider_recent_buy {
                Some(bought) => PredicateOutcome::from_bool(bought),
                None => PredicateOutcome::Missing,
            },
            Predicate::Compare {
                factor,
                comparison,
                value,
            } => match factor.value(snapshot, technical) {
                Some(observed) => PredicateOutcome::from_bool(comparison.holds(observed, *value)),
                None => PredicateOutcome::Missing,
            },
            Predicate::Within { factor, low, high } => match factor.value(snapshot, technical) {
                Some(observed) => PredicateOutcome::from_bool(*low <= observed && observed <= *high),
                None => PredicateOutcome::Missing,
            },
            Predicate::TrendUp => match technical {
                Some(t) => PredicateOutcome::from_bool(t.trend_up()),
                None => PredicateOutcome::Missing,
            },
            Predicate::PriceAboveVwap => match technical {
                Some(t) => PredicateOutcome::from_bool(t.current_price > t.vwap),
                None => PredicateOutcome::Missing,
            },
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::InsiderRecentBuy => write!(f, "insider_recent_buy"),
            Predicate::Compare {
                factor,
                comparison,
                value,
            } => write!(f, "{} {} {}", factor, comparison.symbol(), value),
            Predicate::Within { factor, low, high } => {
                write!(f, "{} <= {} <= {}", low, factor, high)
            }
            Predicate::TrendUp => write!(f, "sma_short > sma_long"),
            Predicate::PriceAboveVwap => write!(f, "price > vwap"),
        }
    }
}
