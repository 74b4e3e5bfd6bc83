use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

/// Cursor value of a ring that has never published. The first real
/// sequence is `0`.
pub const INITIAL_CURSOR_VALUE: i64 = -1;

/// A monotonically increasing 64-bit sequence counter.
///
/// The value is isolated on its own cache line so a producer hammering
/// the cursor does not invalidate lines owned by neighbouring fields.
/// Reads carry acquire semantics and writes release semantics: everything
/// written before `set(s)` is visible to a thread that observes
/// `get() >= s`.
#[derive(Debug)]
pub struct Sequence {
    value: CachePadded<AtomicI64>,
}

impl Sequence {
    pub fn new(initial: i64) -> Self {
        Self {
            value: CachePadded::new(AtomicI64::new(initial)),
        }
    }

    /// Current value (acquire load).
    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Publish a new value (release store).
    #[inline]
    pub fn set(&self, sequence: i64) {
        self.value.store(sequence, Ordering::Release);
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(INITIAL_CURSOR_VALUE)
    }
}

/// Sticky cancellation flag for a consumer barrier.
///
/// Padded onto its own cache line like the cursor; wait strategies poll
/// it on every iteration, so it must not share a line with fields the
/// producer writes.
#[derive(Debug, Default)]
pub struct AlertFlag {
    flag: CachePadded<AtomicBool>,
}

impl AlertFlag {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Handle onto a downstream consumer, as seen by barriers.
///
/// Implementations publish the highest sequence they have fully processed
/// with release semantics and `sequence` reads it back with acquire
/// semantics, so producers gating on the value also observe the reads it
/// covers. `halt` is a lifecycle hook for the owner's event loop; the
/// ring core never calls it.
pub trait Consumer: Send + Sync {
    /// Highest sequence this consumer has finished processing.
    fn sequence(&self) -> i64;

    /// Ask the owning event loop to stop.
    fn halt(&self);
}

/// Minimum of the tracked consumers' sequences, or `fallback` when the
/// slice is empty (callers pass the ring cursor).
///
/// Each handle is read exactly once: a second read could observe a newer
/// value and break the "slowest so far" meaning of the result.
pub fn min_sequence(consumers: &[Arc<dyn Consumer>], fallback: i64) -> i64 {
    consumers
        .iter()
        .map(|consumer| consumer.sequence())
        .min()
        .unwrap_or(fallback)
}

/// Smallest power of two >= `n`, never below 1.
///
/// Ring sizes are rounded through this so `sequence & (capacity - 1)`
/// indexes slots.
pub fn ceil_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(i64);

    impl Consumer for Fixed {
        fn sequence(&self) -> i64 {
            self.0
        }

        fn halt(&self) {}
    }

    #[test]
    fn ceil_pow2_rounds_up() {
        assert_eq!(ceil_pow2(0), 1);
        assert_eq!(ceil_pow2(1), 1);
        assert_eq!(ceil_pow2(20), 32);
        assert_eq!(ceil_pow2(1024), 1024);
    }

    #[test]
    fn min_sequence_picks_the_slowest_handle() {
        let consumers: Vec<Arc<dyn Consumer>> =
            vec![Arc::new(Fixed(8)), Arc::new(Fixed(3)), Arc::new(Fixed(5))];
        assert_eq!(min_sequence(&consumers, -1), 3);
    }

    #[test]
    fn min_sequence_falls_back_when_empty() {
        assert_eq!(min_sequence(&[], INITIAL_CURSOR_VALUE), -1);
        assert_eq!(min_sequence(&[], 41), 41);
    }

    #[test]
    fn sequence_starts_at_initial_cursor_value() {
        let sequence = Sequence::default();
        assert_eq!(sequence.get(), INITIAL_CURSOR_VALUE);
        sequence.set(7);
        assert_eq!(sequence.get(), 7);
    }

    #[test]
    fn alert_flag_toggles_and_is_idempotent() {
        let flag = AlertFlag::new();
        assert!(!flag.is_set());
        flag.set();
        flag.set();
        assert!(flag.is_set());
        flag.clear();
        flag.clear();
        assert!(!flag.is_set());
    }
}
