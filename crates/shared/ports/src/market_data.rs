use confluence_core::{Bar, InstrumentId, Timestamp};

use crate::error::ProviderResult;

/// Port for OHLCV history
pub trait BarSource: Send + Sync {
    /// Up to `max_bars` most recent bars at or before `as_of`, oldest first
    fn history(
        &self,
        instrument_id: &InstrumentId,
        as_of: Timestamp,
        max_bars: usize,
    ) -> ProviderResult<Vec<Bar>>;
}
