use thiserror::Error;

/// Error signals surfaced by the ring.
///
/// Timeouts are deliberately not represented here: the timed wait returns
/// the current cursor and lets the caller compare it against the sequence
/// it asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The consumer barrier was alerted while waiting.
    ///
    /// The alert flag is sticky; the consumer must clear it before it may
    /// resume normal waiting.
    #[error("consumer barrier has been alerted")]
    Alerted,

    /// A producer-side barrier was constructed with no tracked consumers.
    ///
    /// The wrap gate measures against the slowest downstream sequence and
    /// cannot function without at least one.
    #[error("producer barrier requires at least one tracked consumer")]
    NoTrackedConsumers,
}
