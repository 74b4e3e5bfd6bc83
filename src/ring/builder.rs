use crate::ring::buffer::RingBuffer;
use crate::ring::entry::{Entry, EntryFactory};
use crate::sync::claim::{ClaimStrategy, SingleThreadedClaimStrategy};
use crate::sync::wait::{WaitStrategy, YieldingWaitStrategy};

/// Fluent construction for a shared ring.
///
/// Strategies default to the single-threaded claim and yielding wait;
/// the requested size is rounded up to the next power of two.
pub struct RingBuilder {
    size: usize,
    claim: Box<dyn ClaimStrategy>,
    wait: Box<dyn WaitStrategy>,
}

impl RingBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            claim: Box::new(SingleThreadedClaimStrategy::new()),
            wait: Box::new(YieldingWaitStrategy::new()),
        }
    }

    pub fn with_claim_strategy(mut self, claim: Box<dyn ClaimStrategy>) -> Self {
        self.claim = claim;
        self
    }

    pub fn with_wait_strategy(mut self, wait: Box<dyn WaitStrategy>) -> Self {
        self.wait = wait;
        self
    }

    /// Build the ring, invoking `factory` once per slot.
    pub fn build<E, F>(self, factory: F) -> RingBuffer<E>
    where
        E: Entry,
        F: EntryFactory<E>,
    {
        RingBuffer::with_strategies(factory, self.size, self.claim, self.wait)
    }
}
