use crate::error::RingError;
use crate::ring::buffer::RingBuffer;
use crate::ring::entry::Entry;
use crate::sync::sequence::{min_sequence, Consumer};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::thread;

/// Exclusive hold on a claimed slot, returned by the producer barriers.
///
/// Deref to the entry to populate the payload, then hand the guard back
/// to `commit`. Dropping a guard without committing leaves an
/// unpublished hole in the sequence stream, which stalls any later commit
/// waiting on cursor continuity; every claim must be committed.
pub struct ClaimedEntry<'a, E: Entry> {
    entry: &'a mut E,
}

impl<'a, E: Entry> Deref for ClaimedEntry<'a, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.entry
    }
}

impl<'a, E: Entry> DerefMut for ClaimedEntry<'a, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.entry
    }
}

/// Publication barrier for the producer.
///
/// Claims sequences in order, gates on the slowest tracked consumer so
/// unread slots are never overwritten, and publishes through the ring
/// cursor.
pub struct ProducerBarrier<E: Entry> {
    ring: RingBuffer<E>,
    tracked: Vec<Arc<dyn Consumer>>,
}

impl<E: Entry> ProducerBarrier<E> {
    pub(crate) fn new(
        ring: RingBuffer<E>,
        tracked: Vec<Arc<dyn Consumer>>,
    ) -> Result<Self, RingError> {
        if tracked.is_empty() {
            return Err(RingError::NoTrackedConsumers);
        }
        Ok(Self { ring, tracked })
    }

    /// Claim the next entry for writing.
    ///
    /// Blocks (yielding between polls) while the ring is one full lap
    /// ahead of the slowest tracked consumer: no claim is handed out
    /// until `sequence - min(tracked) < capacity` holds.
    pub fn next_entry(&self) -> ClaimedEntry<'_, E> {
        let sequence = self.ring.claim_strategy().get_and_increment();
        self.ensure_consumers_are_in_range(sequence);

        // SAFETY: `sequence` was claimed above and the gate has kept
        // every tracked consumer within one lap, so this slot-generation
        // has exactly one writer and no entitled readers yet.
        let entry = unsafe { self.ring.claimed_entry(sequence) };
        entry.set_sequence(sequence);
        ClaimedEntry { entry }
    }

    /// Publish a populated entry.
    ///
    /// Waits for the cursor to reach `sequence - 1` (a no-op under the
    /// single-threaded claim strategy), release-stores the cursor and
    /// wakes parked waiters.
    pub fn commit(&self, entry: ClaimedEntry<'_, E>) {
        let sequence = entry.sequence();
        self.ring
            .claim_strategy()
            .wait_for_cursor(sequence - 1, self.ring.cursor_sequence());
        // publish
        self.ring.cursor_sequence().set(sequence);
        self.ring.wait_strategy().signal_all();
    }

    /// Current ring cursor.
    #[inline]
    pub fn cursor(&self) -> i64 {
        self.ring.cursor()
    }

    pub(crate) fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    fn ensure_consumers_are_in_range(&self, sequence: i64) {
        let capacity = self.ring.capacity() as i64;
        while sequence - min_sequence(&self.tracked, self.ring.cursor()) >= capacity {
            thread::yield_now();
        }
    }
}

/// Publication barrier that writes at caller-chosen sequences.
///
/// An administrative path for out-of-order publication or recovery from
/// an external record of sequences. It shares the wrap gate with the
/// normal barrier but skips the monotonic-cursor wait, so the cursor may
/// jump forward. Not intended to run concurrently with a normal producer.
pub struct ForceFillProducerBarrier<E: Entry> {
    ring: RingBuffer<E>,
    tracked: Vec<Arc<dyn Consumer>>,
}

impl<E: Entry> ForceFillProducerBarrier<E> {
    pub(crate) fn new(
        ring: RingBuffer<E>,
        tracked: Vec<Arc<dyn Consumer>>,
    ) -> Result<Self, RingError> {
        if tracked.is_empty() {
            return Err(RingError::NoTrackedConsumers);
        }
        Ok(Self { ring, tracked })
    }

    /// Claim the entry for an explicit `sequence`.
    ///
    /// The claim strategy is not consulted; the caller owns sequence
    /// selection on this path. The wrap gate still applies.
    pub fn claim_entry(&self, sequence: i64) -> ClaimedEntry<'_, E> {
        self.ensure_consumers_are_in_range(sequence);

        // SAFETY: as in `ProducerBarrier::next_entry`; this path is the
        // only producer by convention.
        let entry = unsafe { self.ring.claimed_entry(sequence) };
        entry.set_sequence(sequence);
        ClaimedEntry { entry }
    }

    /// Publish a populated entry and resynchronize the claim counter, so
    /// a normal producer picks up at `sequence + 1` afterwards.
    pub fn commit(&self, entry: ClaimedEntry<'_, E>) {
        let sequence = entry.sequence();
        self.ring.claim_strategy().set_sequence(sequence + 1);
        self.ring.cursor_sequence().set(sequence);
        self.ring.wait_strategy().signal_all();
    }

    /// Current ring cursor.
    #[inline]
    pub fn cursor(&self) -> i64 {
        self.ring.cursor()
    }

    pub(crate) fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    fn ensure_consumers_are_in_range(&self, sequence: i64) {
        let capacity = self.ring.capacity() as i64;
        while sequence - min_sequence(&self.tracked, self.ring.cursor()) >= capacity {
            thread::yield_now();
        }
    }
}
