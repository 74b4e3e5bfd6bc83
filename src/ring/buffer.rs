use crate::error::RingError;
use crate::ring::consumer::ConsumerBarrier;
use crate::ring::entry::{Entry, EntryFactory};
use crate::ring::producer::{ForceFillProducerBarrier, ProducerBarrier};
use crate::sync::claim::{ClaimStrategy, SingleThreadedClaimStrategy};
use crate::sync::sequence::{ceil_pow2, Consumer, Sequence};
use crate::sync::wait::{WaitStrategy, YieldingWaitStrategy};
use std::cell::UnsafeCell;
use std::sync::Arc;

struct RingInner<E: Entry> {
    /// Pre-constructed entry cells, indexed by `sequence & mask`. Built
    /// once by the factory and overwritten in place forever after.
    entries: Box<[UnsafeCell<E>]>,

    /// Bitmask wrapping sequences onto slots; `capacity - 1`.
    mask: i64,

    /// Highest published sequence. Starts at `-1`; release-stored by the
    /// committing producer, acquire-loaded everywhere else.
    cursor: Sequence,

    // --- strategies ---

    /// Hands out write sequences to producers.
    claim: Box<dyn ClaimStrategy>,

    /// Parks or spins consumers until a sequence is available.
    wait: Box<dyn WaitStrategy>,
}

// SAFETY: the slots are plain cells of `E`. The publication protocol
// keeps writers exclusive (one claimant per slot-generation, gated a full
// lap behind the slowest consumer) and keeps readers behind the cursor,
// so sharing across threads is sound whenever `E` itself may move and be
// shared across threads.
unsafe impl<E: Entry + Send> Send for RingInner<E> {}
unsafe impl<E: Entry + Send + Sync> Sync for RingInner<E> {}

/// Bounded lock-free ring of pre-allocated entry cells.
///
/// The handle is a cheap clone over shared state; barriers keep their own
/// clone, so dropping any one handle affects nobody else.
///
/// ### Concurrency design
/// - **Producer**: claims a sequence through the claim strategy, mutates
///   the cell at `sequence & mask` and publishes by release-storing the
///   sequence into the cursor. That store is the single linearization
///   point; every write to the cell happens-before it.
/// - **Consumers**: never touch the cursor; a barrier blocks them until
///   the cursor (or the slowest upstream consumer) reaches the sequence
///   they need, then they read the cell.
/// - **Cache-line padding**: the cursor sits in its own padded cell so
///   producer stores do not bounce lines holding neighbouring fields.
pub struct RingBuffer<E: Entry> {
    inner: Arc<RingInner<E>>,
}

impl<E: Entry> Clone for RingBuffer<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entry> RingBuffer<E> {
    /// Ring with the default strategies: single-threaded claim and
    /// yielding wait.
    pub fn new<F>(factory: F, size: usize) -> Self
    where
        F: EntryFactory<E>,
    {
        Self::with_strategies(
            factory,
            size,
            Box::new(SingleThreadedClaimStrategy::new()),
            Box::new(YieldingWaitStrategy::new()),
        )
    }

    /// Ring with explicit claim and wait strategies.
    ///
    /// `size` is rounded up to the next power of two (zero rounds to one
    /// slot); callers do not need to pre-round.
    pub fn with_strategies<F>(
        factory: F,
        size: usize,
        claim: Box<dyn ClaimStrategy>,
        wait: Box<dyn WaitStrategy>,
    ) -> Self
    where
        F: EntryFactory<E>,
    {
        let capacity = ceil_pow2(size);
        let entries: Box<[UnsafeCell<E>]> = (0..capacity)
            .map(|_| UnsafeCell::new(factory.create()))
            .collect();

        Self {
            inner: Arc::new(RingInner {
                entries,
                mask: capacity as i64 - 1,
                cursor: Sequence::default(),
                claim,
                wait,
            }),
        }
    }

    /// Number of slots; always a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.entries.len()
    }

    /// Highest published sequence, `-1` before the first commit.
    #[inline]
    pub fn cursor(&self) -> i64 {
        self.inner.cursor.get()
    }

    /// The entry cell for `sequence`.
    ///
    /// The index is `(sequence & mask)`; the two's-complement truncation
    /// is intentional and maps negative sentinels onto valid slots too.
    /// A cell's payload is only meaningful once `cursor() >= sequence`
    /// has been observed.
    #[inline]
    pub fn entry(&self, sequence: i64) -> &E {
        // SAFETY: shared read of a cell. The protocol keeps the producer
        // out of every slot a consumer is entitled to read: consumers
        // stay behind the cursor and the wrap gate keeps claims a full
        // lap behind the slowest tracked consumer.
        unsafe { &*self.inner.entries[(sequence & self.inner.mask) as usize].get() }
    }

    /// Exclusive access to the cell for a freshly claimed `sequence`.
    ///
    /// # Safety
    /// The caller must hold the claim for `sequence`: at most one writer
    /// may exist per slot-generation, and no consumer may have been let
    /// past it (the producer barriers' capacity gate enforces this).
    #[inline]
    pub(crate) unsafe fn claimed_entry(&self, sequence: i64) -> &mut E {
        &mut *self.inner.entries[(sequence & self.inner.mask) as usize].get()
    }

    /// Barrier for a consumer stage.
    ///
    /// `tracked` holds the stage's upstream consumers; with an empty list
    /// the barrier follows the producer cursor directly.
    pub fn consumer_barrier(&self, tracked: Vec<Arc<dyn Consumer>>) -> ConsumerBarrier<E> {
        ConsumerBarrier::new(self.clone(), tracked)
    }

    /// Barrier for the producer.
    ///
    /// # Errors
    /// [`RingError::NoTrackedConsumers`] when `tracked` is empty: the
    /// wrap gate cannot function without a downstream sequence.
    pub fn producer_barrier(
        &self,
        tracked: Vec<Arc<dyn Consumer>>,
    ) -> Result<ProducerBarrier<E>, RingError> {
        ProducerBarrier::new(self.clone(), tracked)
    }

    /// Barrier publishing at caller-chosen sequences. An administrative
    /// and recovery path; see [`ForceFillProducerBarrier`].
    ///
    /// # Errors
    /// [`RingError::NoTrackedConsumers`] when `tracked` is empty.
    pub fn force_fill_barrier(
        &self,
        tracked: Vec<Arc<dyn Consumer>>,
    ) -> Result<ForceFillProducerBarrier<E>, RingError> {
        ForceFillProducerBarrier::new(self.clone(), tracked)
    }

    // --- narrow view used by the barriers ---

    #[inline]
    pub(crate) fn cursor_sequence(&self) -> &Sequence {
        &self.inner.cursor
    }

    #[inline]
    pub(crate) fn claim_strategy(&self) -> &dyn ClaimStrategy {
        &*self.inner.claim
    }

    #[inline]
    pub(crate) fn wait_strategy(&self) -> &dyn WaitStrategy {
        &*self.inner.wait
    }
}
