use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::instruments::InstrumentId;
use crate::values::Weight;

/// Target portfolio weights for one interval
///
/// Only strictly positive weights are stored; an instrument that is absent
/// holds zero. An empty vector means the whole portfolio sits in cash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationVector {
    weights: BTreeMap<InstrumentId, Weight>,
}

impl AllocationVector {
    /// All-cash allocation
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from (instrument, weight) pairs, dropping non-positive weights
    pub fn from_weights(weights: impl IntoIterator<Item = (InstrumentId, Weight)>) -> Self {
        Self {
            weights: weights
                .into_iter()
                .filter(|(_, w)| *w > Decimal::ZERO)
                .collect(),
        }
    }

    /// Weight for an instrument (zero if absent)
    pub fn weight(&self, instrument_id: &InstrumentId) -> Weight {
        self.weights
            .get(instrument_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, instrument_id: &InstrumentId) -> bool {
        self.weights.contains_key(instrument_id)
    }

    /// Sum of all weights
    pub fn total(&self) -> Weight {
        self.weights.values().sum()
    }

    /// Unallocated share of the portfolio
    pub fn cash(&self) -> Weight {
        (Decimal::ONE - self.total()).max(Decimal::ZERO)
    }

    pub fn is_cash(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate in instrument order
    pub fn iter(&self) -> impl Iterator<Item = (&InstrumentId, &Weight)> {
        self.weights.iter()
    }
}

impl<'a> IntoIterator for &'a AllocationVector {
    type Item = (&'a InstrumentId, &'a Weight);
    type IntoIter = std::collections::btree_map::Iter<'a, InstrumentId, Weight>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.iter()
    }
}
