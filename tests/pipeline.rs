use msgring::{
    BlockingWaitStrategy, Consumer, Entry, MultiThreadedClaimStrategy, RingBuffer, RingBuilder,
    SequenceConsumer, SingleThreadedClaimStrategy, WaitStrategy, YieldingWaitStrategy,
};
use std::sync::Arc;
use std::thread;

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

// Producer -> stage one -> stage two over a single ring. Stage one reads
// right behind the cursor; stage two waits on stage one; the producer
// gates on stage two, the slowest point of the chain.
fn run_pipeline(total: i64, wait: Box<dyn WaitStrategy>) {
    let ring = RingBuffer::with_strategies(
        ValueEntry::default,
        1024,
        Box::new(SingleThreadedClaimStrategy::new()),
        wait,
    );

    let stage_one = Arc::new(SequenceConsumer::new());
    let stage_two = Arc::new(SequenceConsumer::new());

    let producer = ring
        .producer_barrier(vec![stage_two.clone() as Arc<dyn Consumer>])
        .unwrap();
    let barrier_one = Arc::new(ring.consumer_barrier(vec![]));
    let barrier_two = Arc::new(ring.consumer_barrier(vec![
        stage_one.clone() as Arc<dyn Consumer>
    ]));

    let one = thread::spawn({
        let barrier = barrier_one.clone();
        let stage = stage_one.clone();
        move || {
            let mut next = 0i64;
            while next < total {
                let available = barrier.wait_for(next).unwrap();
                for sequence in next..=available {
                    assert_eq!(barrier.entry(sequence).value, sequence * 2);
                    stage.advance_to(sequence);
                }
                next = available + 1;
            }
        }
    });

    let two = thread::spawn({
        let barrier = barrier_two.clone();
        let stage = stage_two.clone();
        move || {
            let mut sum = 0i64;
            let mut next = 0i64;
            while next < total {
                let available = barrier.wait_for(next).unwrap();
                for sequence in next..=available {
                    let entry = barrier.entry(sequence);
                    assert_eq!(entry.sequence, sequence);
                    sum += entry.value;
                    stage.advance_to(sequence);
                }
                next = available + 1;
            }
            sum
        }
    });

    for i in 0..total {
        let mut entry = producer.next_entry();
        entry.value = i * 2;
        producer.commit(entry);
    }

    one.join().unwrap();
    let sum = two.join().unwrap();

    assert_eq!(sum, total * (total - 1)); // sum of 2i for i in 0..total
    assert_eq!(stage_two.sequence(), total - 1);
    assert_eq!(ring.cursor(), total - 1);
}

#[test]
fn two_stage_pipeline_preserves_order_and_values() {
    run_pipeline(100_000, Box::new(YieldingWaitStrategy::new()));
}

#[test]
fn two_stage_pipeline_with_blocking_wait() {
    run_pipeline(10_000, Box::new(BlockingWaitStrategy::new()));
}

#[test]
fn racing_producers_publish_a_contiguous_cursor() {
    let per_producer = 10_000i64;
    let producers = 2i64;
    let total = per_producer * producers;

    let ring = RingBuilder::new(1024)
        .with_claim_strategy(Box::new(MultiThreadedClaimStrategy::new()))
        .build(ValueEntry::default);

    let stage = Arc::new(SequenceConsumer::new());
    let producer = Arc::new(
        ring.producer_barrier(vec![stage.clone() as Arc<dyn Consumer>])
            .unwrap(),
    );
    let barrier = ring.consumer_barrier(vec![]);

    let mut handles = Vec::new();
    for _ in 0..producers {
        let producer = producer.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..per_producer {
                let mut entry = producer.next_entry();
                entry.value = 1;
                producer.commit(entry);
            }
        }));
    }

    // Drain on this thread; the racing committers must never leave a
    // hole behind the cursor.
    let mut sum = 0i64;
    let mut next = 0i64;
    while next < total {
        let available = barrier.wait_for(next).unwrap();
        for sequence in next..=available {
            assert_eq!(barrier.entry(sequence).sequence, sequence);
            sum += barrier.entry(sequence).value;
            stage.advance_to(sequence);
        }
        next = available + 1;
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sum, total);
    assert_eq!(ring.cursor(), total - 1);
}
