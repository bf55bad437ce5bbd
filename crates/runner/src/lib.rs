//! Confluence Runner
//!
//! Drives the allocation engine once per rebalancing interval:
//!
//! - **Harness**: gathers provider data, runs the engine, submits the vector
//! - **Memory**: JSON-backed in-memory providers and a recording sink
//!
//! ## Architecture
//!
//! ```text
//!  SignalProvider ──┐
//!                   ├──► RebalanceHarness ──► AllocationEngine
//!  BarSource ───────┘            │
//!                                ▼
//!                         AllocationSink
//! ```

pub mod error;
pub mod harness;
pub mod memory;

// Re-export main types
pub use error::{Result, RunnerError};
pub use harness::RebalanceHarness;
pub use memory::{InMemoryMarket, InstrumentData, MarketDataSet, RecordingSink, StressReading};
