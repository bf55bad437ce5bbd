mod allocation;
mod bar;
mod insider;
mod records;
mod snapshot;
mod technical;

pub use allocation::AllocationVector;
pub use bar::Bar;
pub use insider::{InsiderTransaction, TransactionSide};
pub use records::{FundamentalRatios, OwnershipRecord, SentimentRecord};
pub use snapshot::SignalSnapshot;
pub use technical::TechnicalReading;
