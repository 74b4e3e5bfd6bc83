use super::sequence::{min_sequence, AlertFlag, Consumer, Sequence};
use crate::error::RingError;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a waiter burns (or yields) CPU while a sequence is not yet
/// available.
///
/// The available sequence is the ring cursor when `consumers` is empty,
/// otherwise the slowest tracked consumer; it may exceed the requested
/// sequence, which callers use to process batches. Every polling step
/// observes the barrier's alert flag and bails out with
/// [`RingError::Alerted`] when it is set. The timed variant returns the
/// current ring cursor on expiry instead of raising an error; callers
/// detect timeout by seeing a result below the requested sequence.
pub trait WaitStrategy: Send + Sync {
    /// Block until `sequence` is available; return the highest available
    /// sequence.
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, RingError>;

    /// As [`wait_for`](WaitStrategy::wait_for), giving up after
    /// `timeout`.
    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, RingError>;

    /// Wake all parked waiters.
    ///
    /// Producer barriers call this after every cursor advance, and
    /// `alert()` calls it so parked consumers observe the flag promptly.
    /// Strategies that never park treat it as a no-op.
    fn signal_all(&self);
}

/// Tight polling loop. Lowest latency, one core pegged per waiter.
pub struct BusySpinWaitStrategy;

impl BusySpinWaitStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BusySpinWaitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for BusySpinWaitStrategy {
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, RingError> {
        let mut available = min_sequence(consumers, cursor.get());
        while available < sequence {
            if alert.is_set() {
                return Err(RingError::Alerted);
            }
            std::hint::spin_loop();
            available = min_sequence(consumers, cursor.get());
        }
        Ok(available)
    }

    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, RingError> {
        let deadline = Instant::now() + timeout;
        let mut available = min_sequence(consumers, cursor.get());
        while available < sequence {
            if alert.is_set() {
                return Err(RingError::Alerted);
            }
            if Instant::now() >= deadline {
                return Ok(cursor.get());
            }
            std::hint::spin_loop();
            available = min_sequence(consumers, cursor.get());
        }
        Ok(available)
    }

    fn signal_all(&self) {}
}

/// Polling loop that yields to the scheduler between probes. The default
/// strategy: near-spin latency without starving sibling threads.
pub struct YieldingWaitStrategy;

impl YieldingWaitStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YieldingWaitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for YieldingWaitStrategy {
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, RingError> {
        let mut available = min_sequence(consumers, cursor.get());
        while available < sequence {
            if alert.is_set() {
                return Err(RingError::Alerted);
            }
            std::thread::yield_now();
            available = min_sequence(consumers, cursor.get());
        }
        Ok(available)
    }

    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, RingError> {
        let deadline = Instant::now() + timeout;
        let mut available = min_sequence(consumers, cursor.get());
        while available < sequence {
            if alert.is_set() {
                return Err(RingError::Alerted);
            }
            if Instant::now() >= deadline {
                return Ok(cursor.get());
            }
            std::thread::yield_now();
            available = min_sequence(consumers, cursor.get());
        }
        Ok(available)
    }

    fn signal_all(&self) {}
}

/// Parks waiters on a condition variable keyed to cursor advances.
///
/// Tracked-consumer progress is not signalled (consumers advance their
/// sequences without touching the strategy), so once the cursor condition
/// passes, any dependency on slower upstream consumers is spin-polled.
/// Spurious wakeups are absorbed by re-checking the condition.
pub struct BlockingWaitStrategy {
    lock: Mutex<()>,
    condvar: Condvar,
}

impl BlockingWaitStrategy {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            condvar: Condvar::new(),
        }
    }
}

impl Default for BlockingWaitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for BlockingWaitStrategy {
    fn wait_for(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
    ) -> Result<i64, RingError> {
        if cursor.get() < sequence {
            let mut guard = self.lock.lock();
            while cursor.get() < sequence {
                if alert.is_set() {
                    return Err(RingError::Alerted);
                }
                // signal_all notifies under the lock, so no wakeup can
                // slip between the check above and this park.
                self.condvar.wait(&mut guard);
            }
        }

        let mut available = min_sequence(consumers, cursor.get());
        while available < sequence {
            if alert.is_set() {
                return Err(RingError::Alerted);
            }
            std::hint::spin_loop();
            available = min_sequence(consumers, cursor.get());
        }
        Ok(available)
    }

    fn wait_for_timeout(
        &self,
        sequence: i64,
        cursor: &Sequence,
        consumers: &[Arc<dyn Consumer>],
        alert: &AlertFlag,
        timeout: Duration,
    ) -> Result<i64, RingError> {
        let deadline = Instant::now() + timeout;

        if cursor.get() < sequence {
            let mut guard = self.lock.lock();
            while cursor.get() < sequence {
                if alert.is_set() {
                    return Err(RingError::Alerted);
                }
                if self.condvar.wait_until(&mut guard, deadline).timed_out() {
                    return Ok(cursor.get());
                }
            }
        }

        let mut available = min_sequence(consumers, cursor.get());
        while available < sequence {
            if alert.is_set() {
                return Err(RingError::Alerted);
            }
            if Instant::now() >= deadline {
                return Ok(cursor.get());
            }
            std::hint::spin_loop();
            available = min_sequence(consumers, cursor.get());
        }
        Ok(available)
    }

    fn signal_all(&self) {
        let _guard = self.lock.lock();
        self.condvar.notify_all();
    }
}
