//! Bounded single-producer / multi-consumer lock-free ring buffer used as
//! an in-process message-exchange fabric between cooperating pipeline
//! stages.
//!
//! A producer claims monotonically increasing sequences, overwrites
//! pre-allocated entry cells in place and publishes each one through a
//! single cursor store. Consumers wait on a barrier that tracks the
//! slowest upstream stage (or the producer cursor) and hands back the
//! highest sequence that is now safe to read, so a stage can process a
//! whole batch per wakeup. No payload object is allocated on the hot
//! path.

pub mod ring;
pub mod sync;

mod error;

pub use error::RingError;
pub use ring::buffer::RingBuffer;
pub use ring::entry::{Entry, EntryFactory};
pub use ring::{
    ClaimedEntry, ConsumerBarrier, ForceFillProducerBarrier, ProducerBarrier, RingBuilder,
    SequenceConsumer,
};
pub use sync::claim::{ClaimStrategy, MultiThreadedClaimStrategy, SingleThreadedClaimStrategy};
pub use sync::sequence::{
    ceil_pow2, min_sequence, AlertFlag, Consumer, Sequence, INITIAL_CURSOR_VALUE,
};
pub use sync::wait::{
    BlockingWaitStrategy, BusySpinWaitStrategy, WaitStrategy, YieldingWaitStrategy,
};
