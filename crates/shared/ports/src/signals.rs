use confluence_core::{
    FundamentalRatios, InsiderTransaction, InstrumentId, OwnershipRecord, Ratio, SentimentRecord,
    Timestamp,
};

use crate::error::ProviderResult;

/// Port for the non-price signal feeds
///
/// Every method answers "latest as of `as_of`"; records published after
/// `as_of` must not be returned. `Ok(None)` / an empty list means the
/// provider has nothing for the instrument, which is not an error.
pub trait SignalProvider: Send + Sync {
    /// Insider filings for the instrument, oldest first
    fn insider_transactions(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Vec<InsiderTransaction>>;

    /// Latest institutional-ownership snapshot
    fn institutional_ownership(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Option<OwnershipRecord>>;

    /// Latest social-sentiment record
    fn social_sentiment(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Option<SentimentRecord>>;

    /// Latest fundamental ratios
    fn fundamental_ratios(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
    ) -> ProviderResult<Option<FundamentalRatios>>;

    /// Latest macro stress index reading (universe-wide)
    fn market_stress(&self, as_of: Timestamp) -> ProviderResult<Option<Ratio>>;

    /// Provider name for logging
    fn name(&self) -> &str {
        "SignalProvider"
    }
}
