// Concurrency primitives the ring core is wired from: padded sequence
// counters, claim strategies and wait strategies.

pub mod claim;
pub mod sequence;
pub mod wait;
