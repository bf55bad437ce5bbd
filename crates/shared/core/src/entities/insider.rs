use serde::{Deserialize, Serialize};

use crate::values::Timestamp;

/// Direction of an insider transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionSide {
    Buy,
    Sell,
    /// Grants, exercises, gifts and anything else that is not an open-market trade
    Other,
}

/// A single insider-trading filing as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderTransaction {
    /// When the filing became public
    pub filed_at: Timestamp,
    /// Raw transaction-type field ("Buy", "P-Purchase", "S-Sale", ...)
    pub transaction_type: String,
}

impl InsiderTransaction {
    pub fn new(filed_at: Timestamp, transaction_type: impl Into<String>) -> Self {
        Self {
            filed_at,
            transaction_type: transaction_type.into(),
        }
    }

    /// Classify the raw transaction type by its leading letter
    ///
    /// `b`/`p` (buy, purchase) → Buy, `s` (sell, sale) → Sell, case-insensitive.
    pub fn side(&self) -> TransactionSide {
        match self
            .transaction_type
            .trim_start()
            .chars()
            .next()
            .map(|c| c.to_ascii_lowercase())
        {
            Some('b') | Some('p') => TransactionSide::Buy,
            Some('s') => TransactionSide::Sell,
            _ => TransactionSide::Other,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.side() == TransactionSide::Buy
    }
}
