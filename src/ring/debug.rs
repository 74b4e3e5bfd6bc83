use super::buffer::RingBuffer;
use super::consumer::ConsumerBarrier;
use super::producer::{ClaimedEntry, ForceFillProducerBarrier, ProducerBarrier};
use crate::ring::entry::Entry;
use std::fmt;

// Debug output sticks to protocol state (capacity, cursor, tracked
// counts); entry cells and strategy objects stay opaque.

impl<E: Entry> fmt::Debug for RingBuffer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor())
            .finish_non_exhaustive()
    }
}

impl<E: Entry> fmt::Debug for ProducerBarrier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerBarrier")
            .field("cursor", &self.cursor())
            .field("tracked_consumers", &self.tracked_len())
            .finish_non_exhaustive()
    }
}

impl<E: Entry> fmt::Debug for ForceFillProducerBarrier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceFillProducerBarrier")
            .field("cursor", &self.cursor())
            .field("tracked_consumers", &self.tracked_len())
            .finish_non_exhaustive()
    }
}

impl<E: Entry> fmt::Debug for ConsumerBarrier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerBarrier")
            .field("cursor", &self.cursor())
            .field("tracked_consumers", &self.tracked_len())
            .field("alerted", &self.is_alerted())
            .finish_non_exhaustive()
    }
}

impl<'a, E: Entry> fmt::Debug for ClaimedEntry<'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimedEntry")
            .field("sequence", &self.sequence())
            .finish_non_exhaustive()
    }
}
