use crate::error::RingError;
use crate::ring::buffer::RingBuffer;
use crate::ring::entry::Entry;
use crate::sync::sequence::{AlertFlag, Consumer, Sequence};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wait-side view of the ring for one consumer stage.
///
/// Tracks the upstream consumers this stage depends on (none means the
/// stage reads right behind the producer cursor) and carries the sticky
/// alert flag that breaks the stage out of a wait. Tearing a barrier
/// down affects nobody else: it holds only shared handles.
pub struct ConsumerBarrier<E: Entry> {
    ring: RingBuffer<E>,
    tracked: Vec<Arc<dyn Consumer>>,
    alert: AlertFlag,
}

impl<E: Entry> ConsumerBarrier<E> {
    pub(crate) fn new(ring: RingBuffer<E>, tracked: Vec<Arc<dyn Consumer>>) -> Self {
        Self {
            ring,
            tracked,
            alert: AlertFlag::new(),
        }
    }

    /// Wait until `sequence` is observable and return the highest
    /// observable sequence, which may be greater; callers use that to
    /// process batches.
    ///
    /// # Errors
    /// [`RingError::Alerted`] once [`alert`](Self::alert) has been
    /// called; the flag stays set until
    /// [`clear_alert`](Self::clear_alert).
    pub fn wait_for(&self, sequence: i64) -> Result<i64, RingError> {
        self.ring.wait_strategy().wait_for(
            sequence,
            self.ring.cursor_sequence(),
            &self.tracked,
            &self.alert,
        )
    }

    /// As [`wait_for`](Self::wait_for) but gives up after `timeout`,
    /// returning the current cursor (possibly `-1`, and possibly below
    /// `sequence`) instead of an error.
    pub fn wait_for_timeout(&self, sequence: i64, timeout: Duration) -> Result<i64, RingError> {
        self.ring.wait_strategy().wait_for_timeout(
            sequence,
            self.ring.cursor_sequence(),
            &self.tracked,
            &self.alert,
            timeout,
        )
    }

    /// Current ring cursor.
    #[inline]
    pub fn cursor(&self) -> i64 {
        self.ring.cursor()
    }

    /// Direct slot access, identical to [`RingBuffer::entry`].
    #[inline]
    pub fn entry(&self, sequence: i64) -> &E {
        self.ring.entry(sequence)
    }

    /// Whether the sticky alert flag is set.
    #[inline]
    pub fn is_alerted(&self) -> bool {
        self.alert.is_set()
    }

    /// Set the alert flag and wake parked waiters so they observe it
    /// promptly. Alert is the only cancellation mechanism; timeouts
    /// return normally.
    pub fn alert(&self) {
        self.alert.set();
        self.ring.wait_strategy().signal_all();
    }

    /// Clear the flag so the consumer may resume waiting.
    pub fn clear_alert(&self) {
        self.alert.clear();
    }

    pub(crate) fn tracked_len(&self) -> usize {
        self.tracked.len()
    }
}

/// Canonical [`Consumer`] handle: an owned progress sequence plus a halt
/// latch for the owning event loop.
///
/// The event loop itself is user code; it processes entries, calls
/// [`advance_to`](Self::advance_to) as it finishes them, and polls
/// [`is_halted`](Self::is_halted) to honour shutdown requests.
#[derive(Debug, Default)]
pub struct SequenceConsumer {
    sequence: Sequence,
    halted: AtomicBool,
}

impl SequenceConsumer {
    /// Fresh handle at sequence `-1`: nothing processed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish that every sequence up to and including `sequence` has
    /// been processed (release store).
    #[inline]
    pub fn advance_to(&self, sequence: i64) {
        self.sequence.set(sequence);
    }

    /// Whether `halt` has been requested.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }
}

impl Consumer for SequenceConsumer {
    #[inline]
    fn sequence(&self) -> i64 {
        self.sequence.get()
    }

    fn halt(&self) {
        self.halted.store(true, Ordering::Release);
    }
}
