//! Instrument identifiers for the tradable universe

mod instrument;

pub use instrument::InstrumentId;
