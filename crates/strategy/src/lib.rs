//! Confluence Strategy
//!
//! Turns per-instrument signals into a target allocation:
//! - Threshold predicates over fundamentals, sentiment and technicals
//! - Signal gate (hard conjunction or weighted score)
//! - Strategy configuration loaded from JSON
//! - Allocation engine running the gate and the position sizer
//! - Presets for the known strategy variants
//!
//! ## Architecture
//!
//! ```text
//!   SignalSnapshot ─┐
//!                   ├──► GateEvaluator ──► SizingCandidate ──► PositionSizer
//! TechnicalReading ─┘         (per instrument, parallel)           │
//!                                                                  ▼
//!                                                         AllocationVector
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use confluence_strategy::{AllocationEngine, presets};
//!
//! let engine = AllocationEngine::new(presets::volatility_regime(["AAPL", "MSFT"]))?;
//! let report = engine.rebalance(&market);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod predicate;
pub mod presets;

// Re-export main types
pub use config::{Interval, QualityBoost, StrategyConfig};
pub use engine::{
    AllocationEngine, InstrumentInputs, InstrumentOutcome, MarketSnapshot, RebalanceReport,
};
pub use error::{Error, Result};
pub use gate::{
    GateConfig, GateEvaluator, GateMode, GateVerdict, IneligibleReason, WeightedPredicate,
};
pub use predicate::{Comparison, Factor, Predicate, PredicateOutcome};
