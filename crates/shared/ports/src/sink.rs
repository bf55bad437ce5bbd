use confluence_core::{AllocationVector, Timestamp};

/// Port for the consumer of target allocations (the execution harness)
///
/// The sink takes ownership of the vector; the engine keeps no copy.
pub trait AllocationSink {
    fn submit(&mut self, as_of: Timestamp, allocation: AllocationVector);
}
