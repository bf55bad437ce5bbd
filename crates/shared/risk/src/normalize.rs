use confluence_core::{AllocationVector, InstrumentId, Weight};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// Decimal places kept on rescaled weights
///
/// Rescaled weights are truncated toward zero so the rounded total can
/// never exceed 1.
pub const WEIGHT_DP: u32 = 16;

/// Portfolio-level normalization
///
/// If the total exceeds 1, every weight is rescaled by the same factor so the
/// total becomes 1 (relative ratios preserved). A total at or below 1 is left
/// untouched; weights are never scaled up. Non-positive weights are dropped.
pub fn normalize(weights: &BTreeMap<InstrumentId, Weight>) -> AllocationVector {
    let total: Decimal = weights.values().filter(|w| **w > Decimal::ZERO).sum();

    if total <= Decimal::ONE {
        return AllocationVector::from_weights(weights.iter().map(|(id, w)| (id.clone(), *w)));
    }

    AllocationVector::from_weights(weights.iter().map(|(id, w)| {
        let scaled = (*w / total).round_dp_with_strategy(WEIGHT_DP, RoundingStrategy::ToZero);
        (id.clone(), scaled)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn weights(pairs: &[(&str, Decimal)]) -> BTreeMap<InstrumentId, Weight> {
        pairs
            .iter()
            .map(|(id, w)| (InstrumentId::new(*id), *w))
            .collect()
    }

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.001)
    }

    #[test]
    fn test_over_allocation_rescales_proportionally() {
        let raw = weights(&[
            ("A", dec!(0.25)),
            ("B", dec!(0.25)),
            ("C", dec!(0.25)),
            ("D", dec!(0.4)),
        ]);
        let v = normalize(&raw);

        assert!(close(v.weight(&InstrumentId::new("A")), dec!(0.217)));
        assert!(close(v.weight(&InstrumentId::new("B")), dec!(0.217)));
        assert!(close(v.weight(&InstrumentId::new("C")), dec!(0.217)));
        assert!(close(v.weight(&InstrumentId::new("D")), dec!(0.348)));
        assert!(v.total() <= Decimal::ONE);
        assert!((Decimal::ONE - v.total()) < dec!(0.000000000001));
        // Relative ratios preserved
        assert_eq!(
            v.weight(&InstrumentId::new("A")),
            v.weight(&InstrumentId::new("C"))
        );
    }

    #[test]
    fn test_under_allocation_is_not_scaled_up() {
        let raw = weights(&[("A", dec!(0.2)), ("B", dec!(0.3))]);
        let v = normalize(&raw);

        assert_eq!(v.weight(&InstrumentId::new("A")), dec!(0.2));
        assert_eq!(v.weight(&InstrumentId::new("B")), dec!(0.3));
        assert_eq!(v.total(), dec!(0.5));
    }

    #[test]
    fn test_exactly_one_is_untouched() {
        let raw = weights(&[("A", dec!(0.5)), ("B", dec!(0.5))]);
        assert_eq!(normalize(&raw).total(), Decimal::ONE);
    }

    #[test]
    fn test_empty_is_all_cash() {
        let v = normalize(&BTreeMap::new());
        assert!(v.is_cash());
    }

    #[test]
    fn test_zero_weights_dropped() {
        let raw = weights(&[("A", dec!(0.5)), ("B", Decimal::ZERO)]);
        let v = normalize(&raw);
        assert_eq!(v.len(), 1);
    }
}
