use msgring::{
    BlockingWaitStrategy, BusySpinWaitStrategy, Consumer, Entry, RingBuffer, RingError,
    SequenceConsumer, SingleThreadedClaimStrategy, WaitStrategy, YieldingWaitStrategy,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct ValueEntry {
    sequence: i64,
    value: i64,
}

impl Entry for ValueEntry {
    fn sequence(&self) -> i64 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: i64) {
        self.sequence = sequence;
    }
}

fn ring_with(wait: Box<dyn WaitStrategy>) -> RingBuffer<ValueEntry> {
    RingBuffer::with_strategies(
        ValueEntry::default,
        16,
        Box::new(SingleThreadedClaimStrategy::new()),
        wait,
    )
}

fn observes_cross_thread_publication(wait: Box<dyn WaitStrategy>) {
    let ring = ring_with(wait);
    let follower = Arc::new(SequenceConsumer::new());
    let tracked: Vec<Arc<dyn Consumer>> = vec![follower.clone()];
    let producer = ring.producer_barrier(tracked).unwrap();
    let barrier = Arc::new(ring.consumer_barrier(vec![]));

    let waiter = thread::spawn({
        let barrier = barrier.clone();
        move || barrier.wait_for(2)
    });

    thread::sleep(Duration::from_millis(20));
    for i in 0..3 {
        let mut entry = producer.next_entry();
        entry.value = i * 7;
        producer.commit(entry);
    }

    let available = waiter.join().unwrap().unwrap();
    assert!(available >= 2);
    for i in 0..3 {
        assert_eq!(barrier.entry(i).value, i * 7);
    }
}

#[test]
fn busy_spin_observes_cross_thread_publication() {
    observes_cross_thread_publication(Box::new(BusySpinWaitStrategy::new()));
}

#[test]
fn yielding_observes_cross_thread_publication() {
    observes_cross_thread_publication(Box::new(YieldingWaitStrategy::new()));
}

#[test]
fn blocking_observes_cross_thread_publication() {
    observes_cross_thread_publication(Box::new(BlockingWaitStrategy::new()));
}

fn timed_wait_expires_with_cursor(wait: Box<dyn WaitStrategy>) {
    let ring = ring_with(wait);
    let barrier = ring.consumer_barrier(vec![]);
    assert_eq!(
        barrier.wait_for_timeout(0, Duration::from_millis(10)),
        Ok(-1)
    );
}

#[test]
fn busy_spin_timed_wait_expires_with_cursor() {
    timed_wait_expires_with_cursor(Box::new(BusySpinWaitStrategy::new()));
}

#[test]
fn yielding_timed_wait_expires_with_cursor() {
    timed_wait_expires_with_cursor(Box::new(YieldingWaitStrategy::new()));
}

#[test]
fn blocking_timed_wait_expires_with_cursor() {
    timed_wait_expires_with_cursor(Box::new(BlockingWaitStrategy::new()));
}

#[test]
fn timed_wait_reports_partial_progress_via_the_cursor() {
    let ring = ring_with(Box::new(YieldingWaitStrategy::new()));
    let follower = Arc::new(SequenceConsumer::new());
    let tracked: Vec<Arc<dyn Consumer>> = vec![follower.clone()];
    let producer = ring.producer_barrier(tracked).unwrap();
    let barrier = ring.consumer_barrier(vec![]);

    for i in 0..3 {
        let mut entry = producer.next_entry();
        entry.value = i;
        producer.commit(entry);
    }

    // Sequence 5 never arrives; the caller sees 2 < 5 and infers timeout.
    assert_eq!(barrier.wait_for_timeout(5, Duration::from_millis(10)), Ok(2));
}

#[test]
fn blocking_wait_parks_until_signalled() {
    let ring = ring_with(Box::new(BlockingWaitStrategy::new()));
    let follower = Arc::new(SequenceConsumer::new());
    let tracked: Vec<Arc<dyn Consumer>> = vec![follower.clone()];
    let producer = ring.producer_barrier(tracked).unwrap();
    let barrier = Arc::new(ring.consumer_barrier(vec![]));

    let waiter = thread::spawn({
        let barrier = barrier.clone();
        move || barrier.wait_for(0)
    });

    // Give the waiter time to park before the commit signals.
    thread::sleep(Duration::from_millis(50));
    let mut entry = producer.next_entry();
    entry.value = 17;
    producer.commit(entry);

    assert_eq!(waiter.join().unwrap(), Ok(0));
    assert_eq!(barrier.entry(0).value, 17);
}

#[test]
fn alert_unparks_a_blocked_waiter() {
    let ring = ring_with(Box::new(BlockingWaitStrategy::new()));
    let barrier = Arc::new(ring.consumer_barrier(vec![]));

    let waiter = thread::spawn({
        let barrier = barrier.clone();
        move || barrier.wait_for(0)
    });

    thread::sleep(Duration::from_millis(50));
    barrier.alert();
    assert_eq!(waiter.join().unwrap(), Err(RingError::Alerted));
}

#[test]
fn wait_returns_the_highest_available_sequence() {
    let ring = ring_with(Box::new(BusySpinWaitStrategy::new()));
    let follower = Arc::new(SequenceConsumer::new());
    let tracked: Vec<Arc<dyn Consumer>> = vec![follower.clone()];
    let producer = ring.producer_barrier(tracked).unwrap();
    let barrier = ring.consumer_barrier(vec![]);

    for i in 0..5 {
        let mut entry = producer.next_entry();
        entry.value = i;
        producer.commit(entry);
    }

    // Five entries are out; asking for 2 hands the whole batch over.
    assert_eq!(barrier.wait_for(2), Ok(4));
}
