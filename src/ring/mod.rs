mod builder;
mod consumer;
mod debug;
mod producer;

pub use builder::RingBuilder;
pub use consumer::{ConsumerBarrier, SequenceConsumer};
pub use producer::{ClaimedEntry, ForceFillProducerBarrier, ProducerBarrier};

pub mod buffer;
pub mod entry;
