use confluence_core::Ratio;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market risk state for one interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Calm market (or no stress reading available)
    RiskOn,
    /// Stress index above threshold
    RiskOff,
}

/// Scales the per-instrument cap when the stress index signals risk-off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeScaling {
    /// Stress readings strictly above this are risk-off
    #[serde(default)]
    pub stress_threshold: Ratio,
    /// Cap multiplier applied in risk-off, e.g. 0.35
    pub risk_off_factor: Ratio,
}

impl RegimeScaling {
    pub fn new(risk_off_factor: Ratio) -> Self {
        Self {
            stress_threshold: Decimal::ZERO,
            risk_off_factor,
        }
    }

    pub fn with_threshold(mut self, stress_threshold: Ratio) -> Self {
        self.stress_threshold = stress_threshold;
        self
    }

    /// Classify the latest stress reading; a missing reading is risk-on
    pub fn assess(&self, stress: Option<Ratio>) -> Regime {
        match stress {
            Some(level) if level > self.stress_threshold => Regime::RiskOff,
            _ => Regime::RiskOn,
        }
    }

    /// Cap multiplier for a regime
    pub fn factor(&self, regime: Regime) -> Ratio {
        match regime {
            Regime::RiskOn => Decimal::ONE,
            Regime::RiskOff => self.risk_off_factor,
        }
    }
}
