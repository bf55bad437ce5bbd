//! Confluence Risk
//!
//! Turns the eligible subset of the universe into a valid allocation:
//!
//! 1. **Regime**: scale the per-instrument cap once per interval from the
//!    market-stress reading (risk-off vs risk-on)
//! 2. **Raw weight**: equal-weight, volatility-adjusted, or score-tiered
//! 3. **Quality boost**: per-candidate multiplier supplied by the gate
//! 4. **Cap**: clamp into `[0, effective cap]`
//! 5. **Normalize**: proportional rescale when the total exceeds 1
//!
//! ```text
//! candidates ──► raw ──► × boost ──► clamp(0, cap) ──► normalize ──► AllocationVector
//!                 ▲                       ▲
//!                 └──── effective cap ────┘  (max_position × regime factor)
//! ```
//!
//! Per-instrument failures (missing ATR, zero price) surface as a
//! [`SizingError`] for that instrument only; the rest of the universe is
//! still sized.

mod config;
mod normalize;
mod regime;
mod sizer;

pub use config::{RiskConfigError, ScoreTier, SizingConfig, SizingPolicy};
pub use normalize::{WEIGHT_DP, normalize};
pub use regime::{Regime, RegimeScaling};
pub use sizer::{PositionSizer, SizedPosition, SizingCandidate, SizingError, SizingReport};
