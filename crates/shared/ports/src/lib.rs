//! Confluence Ports
//!
//! Port definitions (traits) for the Confluence allocation engine.
//! These define the boundaries between the engine and the external
//! collaborators that feed it (signal providers, OHLCV history) and
//! consume its output (the execution harness).

mod error;
mod market_data;
mod signals;
mod sink;

pub use error::{ProviderError, ProviderResult};
pub use market_data::BarSource;
pub use signals::SignalProvider;
pub use sink::AllocationSink;
