use confluence_core::{Ratio, Weight};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::regime::RegimeScaling;

/// Invalid sizing configuration, raised at construction time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskConfigError {
    #[error("max_position must be in (0, 1], got {0}")]
    InvalidMaxPosition(Decimal),

    #[error("volatility sensitivity must be non-negative, got {0}")]
    NegativeSensitivity(Decimal),

    #[error("damp_ceiling must be in [0, 1], got {0}")]
    InvalidDampCeiling(Decimal),

    #[error("risk_off_factor must be in [0, 1], got {0}")]
    InvalidRegimeFactor(Decimal),

    #[error("score tiers must not be empty")]
    EmptyTiers,

    #[error("score tier weight must be in [0, 1], got {0}")]
    InvalidTierWeight(Decimal),
}

/// Maps a gate score to a fixed weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    /// Inclusive lower bound on the gate score
    pub min_score: Decimal,
    pub weight: Weight,
}

impl ScoreTier {
    pub fn new(min_score: Decimal, weight: Weight) -> Self {
        Self { min_score, weight }
    }
}

/// How raw weights are chosen for eligible instruments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SizingPolicy {
    /// 1 / number of eligible instruments
    EqualWeight,
    /// cap × (1 − min(ATR / price × sensitivity, damp_ceiling))
    VolatilityAdjusted {
        sensitivity: Ratio,
        damp_ceiling: Ratio,
    },
    /// Weight of the highest tier the gate score reaches
    ScoreTiered { tiers: Vec<ScoreTier> },
}

/// Sizing configuration for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Per-instrument cap before regime scaling
    pub max_position: Weight,
    pub policy: SizingPolicy,
    /// Optional risk-off scaling of the cap
    #[serde(default)]
    pub regime: Option<RegimeScaling>,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self::equal_weight()
    }
}

impl SizingConfig {
    /// Equal weight, uncapped (cap = 1)
    pub fn equal_weight() -> Self {
        Self {
            max_position: Decimal::ONE,
            policy: SizingPolicy::EqualWeight,
            regime: None,
        }
    }

    /// Volatility-adjusted sizing
    pub fn volatility_adjusted(max_position: Weight, sensitivity: Ratio, damp_ceiling: Ratio) -> Self {
        Self {
            max_position,
            policy: SizingPolicy::VolatilityAdjusted {
                sensitivity,
                damp_ceiling,
            },
            regime: None,
        }
    }

    /// Score-tiered sizing
    pub fn score_tiered(max_position: Weight, tiers: Vec<ScoreTier>) -> Self {
        Self {
            max_position,
            policy: SizingPolicy::ScoreTiered { tiers },
            regime: None,
        }
    }

    pub fn with_max_position(mut self, max_position: Weight) -> Self {
        self.max_position = max_position;
        self
    }

    pub fn with_regime(mut self, regime: RegimeScaling) -> Self {
        self.regime = Some(regime);
        self
    }

    pub fn validate(&self) -> Result<(), RiskConfigError> {
        if self.max_position <= Decimal::ZERO || self.max_position > Decimal::ONE {
            return Err(RiskConfigError::InvalidMaxPosition(self.max_position));
        }

        match &self.policy {
            SizingPolicy::EqualWeight => {}
            SizingPolicy::VolatilityAdjusted {
                sensitivity,
                damp_ceiling,
            } => {
                if *sensitivity < Decimal::ZERO {
                    return Err(RiskConfigError::NegativeSensitivity(*sensitivity));
                }
                if !in_unit_interval(*damp_ceiling) {
                    return Err(RiskConfigError::InvalidDampCeiling(*damp_ceiling));
                }
            }
            SizingPolicy::ScoreTiered { tiers } => {
                if tiers.is_empty() {
                    return Err(RiskConfigError::EmptyTiers);
                }
                if let Some(tier) = tiers.iter().find(|t| !in_unit_interval(t.weight)) {
                    return Err(RiskConfigError::InvalidTierWeight(tier.weight));
                }
            }
        }

        if let Some(regime) = &self.regime
            && !in_unit_interval(regime.risk_off_factor)
        {
            return Err(RiskConfigError::InvalidRegimeFactor(regime.risk_off_factor));
        }

        Ok(())
    }
}

fn in_unit_interval(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= dec!(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_equal_weight() {
        let config = SizingConfig::default();
        assert_eq!(config.policy, SizingPolicy::EqualWeight);
        assert_eq!(config.max_position, Decimal::ONE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_cap() {
        let config = SizingConfig::equal_weight().with_max_position(dec!(-0.1));
        assert_eq!(
            config.validate(),
            Err(RiskConfigError::InvalidMaxPosition(dec!(-0.1)))
        );
    }

    #[test]
    fn test_rejects_cap_above_one() {
        let config = SizingConfig::equal_weight().with_max_position(dec!(1.5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_damp_ceiling() {
        let config = SizingConfig::volatility_adjusted(dec!(0.25), dec!(10), dec!(1.2));
        assert_eq!(
            config.validate(),
            Err(RiskConfigError::InvalidDampCeiling(dec!(1.2)))
        );
    }

    #[test]
    fn test_rejects_negative_sensitivity() {
        let config = SizingConfig::volatility_adjusted(dec!(0.25), dec!(-1), dec!(0.5));
        assert!(matches!(
            config.validate(),
            Err(RiskConfigError::NegativeSensitivity(_))
        ));
    }

    #[test]
    fn test_rejects_bad_regime_factor() {
        let config = SizingConfig::volatility_adjusted(dec!(0.25), dec!(10), dec!(0.5))
            .with_regime(RegimeScaling::new(dec!(1.5)));
        assert_eq!(
            config.validate(),
            Err(RiskConfigError::InvalidRegimeFactor(dec!(1.5)))
        );
    }

    #[test]
    fn test_rejects_empty_tiers() {
        let config = SizingConfig::score_tiered(dec!(1), Vec::new());
        assert_eq!(config.validate(), Err(RiskConfigError::EmptyTiers));
    }

    #[test]
    fn test_policy_json_shape() {
        let json = r#"{
            "max_position": 0.25,
            "policy": { "mode": "volatility_adjusted", "sensitivity": 10, "damp_ceiling": 0.5 },
            "regime": { "risk_off_factor": 0.35 }
        }"#;
        let config: SizingConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.max_position, dec!(0.25));
        assert_eq!(
            config.policy,
            SizingPolicy::VolatilityAdjusted {
                sensitivity: dec!(10),
                damp_ceiling: dec!(0.5),
            }
        );
        let regime = config.regime.unwrap();
        assert_eq!(regime.risk_off_factor, dec!(0.35));
        assert_eq!(regime.stress_threshold, Decimal::ZERO);
    }
}
