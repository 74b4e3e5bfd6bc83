use super::sequence::Sequence;
use std::sync::atomic::{AtomicI64, Ordering};

/// How producers obtain the next write sequence.
///
/// The counter starts at `0`, so the first claim returns sequence `0`
/// while the ring cursor still reads `-1`.
pub trait ClaimStrategy: Send + Sync {
    /// Return the next sequence to publish and advance the counter.
    fn get_and_increment(&self) -> i64;

    /// Force the counter to `sequence`.
    ///
    /// Only the force-fill path uses this, to resynchronize the allocator
    /// after an explicit-sequence publication.
    fn set_sequence(&self, sequence: i64);

    /// Block until `cursor` has reached `target`.
    ///
    /// Commit calls this with `sequence - 1` so cursor publications stay
    /// contiguous even when claimants race.
    fn wait_for_cursor(&self, target: i64, cursor: &Sequence);
}

/// Claim strategy for a single producing thread.
///
/// The counter is kept relaxed: with one claimant there is nothing to
/// order against, and the cursor release store in commit carries the
/// publication edge. Calling `get_and_increment` from more than one
/// thread breaks the protocol; use [`MultiThreadedClaimStrategy`] there.
pub struct SingleThreadedClaimStrategy {
    claim: AtomicI64,
}

impl SingleThreadedClaimStrategy {
    pub fn new() -> Self {
        Self {
            claim: AtomicI64::new(0),
        }
    }
}

impl Default for SingleThreadedClaimStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimStrategy for SingleThreadedClaimStrategy {
    #[inline]
    fn get_and_increment(&self) -> i64 {
        self.claim.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn set_sequence(&self, sequence: i64) {
        self.claim.store(sequence, Ordering::Relaxed);
    }

    #[inline]
    fn wait_for_cursor(&self, _target: i64, _cursor: &Sequence) {
        // The committing thread is the claiming thread, so the cursor is
        // already at the target on arrival. Retained as the serialization
        // hook the multi-producer strategy needs.
    }
}

/// Claim strategy tolerating multiple producing threads.
///
/// Claims are handed out with an atomic fetch-add; each committer then
/// spins in `wait_for_cursor` until every earlier claim has published, so
/// the cursor still advances in sequence order.
pub struct MultiThreadedClaimStrategy {
    claim: AtomicI64,
}

impl MultiThreadedClaimStrategy {
    pub fn new() -> Self {
        Self {
            claim: AtomicI64::new(0),
        }
    }
}

impl Default for MultiThreadedClaimStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimStrategy for MultiThreadedClaimStrategy {
    #[inline]
    fn get_and_increment(&self) -> i64 {
        self.claim.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    fn set_sequence(&self, sequence: i64) {
        self.claim.store(sequence, Ordering::Release);
    }

    fn wait_for_cursor(&self, target: i64, cursor: &Sequence) {
        while cursor.get() < target {
            std::hint::spin_loop();
        }
    }
}
