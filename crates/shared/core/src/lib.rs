//! Confluence Core Domain
//!
//! Pure domain types for the Confluence allocation engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod instruments;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Allocation output
    AllocationVector,
    // Market history
    Bar,
    // Signal-provider records
    FundamentalRatios,
    InsiderTransaction,
    OwnershipRecord,
    SentimentRecord,
    // Per-interval inputs
    SignalSnapshot,
    TechnicalReading,
    TransactionSide,
};
pub use instruments::InstrumentId;
pub use values::{Price, Ratio, Timestamp, Weight};
