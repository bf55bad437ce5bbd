//! Ready-made strategy configurations
//!
//! Each preset is an ordinary [`StrategyConfig`]; callers may adjust any
//! field before building an engine.

use confluence_core::InstrumentId;
use confluence_risk::{RegimeScaling, ScoreTier, SizingConfig};
use rust_decimal_macros::dec;

use crate::config::{QualityBoost, StrategyConfig};
use crate::gate::{GateConfig, WeightedPredicate};
use crate::predicate::{Factor, Predicate};

/// Hard seven-factor gate, equal weight across survivors
///
/// Insider buying, ownership > 50, sentiment > 0.5, debt/equity < 1,
/// ROE > 15 (percent units), RSI < 30, SMA20 > SMA50.
pub fn multi_factor_equal_weight(
    universe: impl IntoIterator<Item = impl Into<InstrumentId>>,
) -> StrategyConfig {
    let gate = GateConfig::hard([
        Predicate::InsiderRecentBuy,
        Predicate::above(Factor::InstitutionalOwnership, dec!(50)),
        Predicate::above(Factor::SocialSentiment, dec!(0.5)),
        Predicate::below(Factor::DebtEquity, dec!(1)),
        Predicate::above(Factor::ReturnOnEquity, dec!(15)),
        Predicate::below(Factor::Rsi, dec!(30)),
        Predicate::TrendUp,
    ]);

    StrategyConfig::new(
        "multi_factor_equal_weight",
        universe,
        gate,
        SizingConfig::equal_weight(),
    )
}

/// Hard gate with volatility-damped sizing and risk-off scaling
///
/// Cap 0.25, sensitivity 10, damp ceiling 0.5; ROE > 0.15 (fraction
/// units) boosts the raw weight by 1.2; any positive stress reading scales
/// the cap by 0.35.
pub fn volatility_regime(
    universe: impl IntoIterator<Item = impl Into<InstrumentId>>,
) -> StrategyConfig {
    let gate = GateConfig::hard([
        Predicate::InsiderRecentBuy,
        Predicate::above(Factor::InstitutionalOwnership, dec!(50)),
        Predicate::above(Factor::SocialSentiment, dec!(0.5)),
        Predicate::below(Factor::DebtEquity, dec!(1)),
        Predicate::within(Factor::Rsi, dec!(30), dec!(70)),
        Predicate::TrendUp,
    ]);

    let sizing = SizingConfig::volatility_adjusted(dec!(0.25), dec!(10), dec!(0.5))
        .with_regime(RegimeScaling::new(dec!(0.35)));

    StrategyConfig::new("volatility_regime", universe, gate, sizing).with_quality(
        QualityBoost::new(
            Predicate::above(Factor::ReturnOnEquity, dec!(0.15)),
            dec!(1.2),
        ),
    )
}

/// Single-instrument tiers on insider buying and sentiment
///
/// Both positive → 0.75, one → 0.5, neither → 0.25. Insider bias comes
/// from the most recent filing only.
pub fn insider_sentiment_tiers(instrument: impl Into<InstrumentId>) -> StrategyConfig {
    let gate = GateConfig::scored(
        dec!(-1),
        vec![
            WeightedPredicate::new(Predicate::InsiderRecentBuy),
            WeightedPredicate::new(Predicate::above(Factor::SocialSentiment, dec!(0.5))),
        ],
    );

    let sizing = SizingConfig::score_tiered(
        dec!(1),
        vec![
            ScoreTier::new(dec!(2), dec!(0.75)),
            ScoreTier::new(dec!(1), dec!(0.5)),
            ScoreTier::new(dec!(0), dec!(0.25)),
        ],
    );

    StrategyConfig::new("insider_sentiment_tiers", [instrument.into()], gate, sizing)
        .with_insider_lookback(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(multi_factor_equal_weight(["AAPL", "MSFT"]).validate().is_ok());
        assert!(volatility_regime(["AAPL"]).validate().is_ok());
        assert!(insider_sentiment_tiers("AAPL").validate().is_ok());
    }

    #[test]
    fn test_presets_json_round_trip() {
        for config in [
            multi_factor_equal_weight(["AAPL", "MSFT"]),
            volatility_regime(["AAPL", "NVDA"]),
            insider_sentiment_tiers("TSLA"),
        ] {
            let json = config.to_json().unwrap();
            let parsed = StrategyConfig::from_json(&json).unwrap();
            assert_eq!(parsed, config);
        }
    }

    #[test]
    fn test_volatility_regime_shape() {
        let config = volatility_regime(["AAPL"]);
        assert_eq!(config.sizing.max_position, dec!(0.25));
        assert_eq!(config.quality.as_ref().map(|q| q.multiplier), Some(dec!(1.2)));
        assert_eq!(
            config.sizing.regime.as_ref().map(|r| r.risk_off_factor),
            Some(dec!(0.35))
        );
    }
}
