// Blocking consumer demo: the worker parks on the ring's condition
// variable between bursts and is shut down with an alert once the
// producer is done.
//
// Usage: cargo run --example blocking_consumer

use msgring::{
    BlockingWaitStrategy, Consumer, Entry, RingBuffer, RingError, SequenceConsumer,
    SingleThreadedClaimStrategy,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct ValueEntry {
    sequence: i64,
    value: u64,
}

impl Default for ValueEntry {
    fn default() -> Self {
        Self {
            sequence: -1,
            value: 0,
        }
    }
}

impl Entry for ValueEntry {
    fn sequence(&self) -> i64 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: i64) {
        self.sequence = sequence;
    }
}

fn main() {
    let ring = RingBuffer::with_strategies(
        ValueEntry::default,
        1024,
        Box::new(SingleThreadedClaimStrategy::new()),
        Box::new(BlockingWaitStrategy::new()),
    );

    let consumer = Arc::new(SequenceConsumer::new());
    let producer = ring
        .producer_barrier(vec![consumer.clone() as Arc<dyn Consumer>])
        .unwrap();
    let barrier = Arc::new(ring.consumer_barrier(vec![]));

    println!("Consumer: waiting for messages...");

    let worker = thread::spawn({
        let barrier = barrier.clone();
        let consumer = consumer.clone();
        move || {
            let mut received = 0u64;
            let mut next = 0i64;
            loop {
                match barrier.wait_for(next) {
                    Ok(available) => {
                        for sequence in next..=available {
                            received += barrier.entry(sequence).value;
                            consumer.advance_to(sequence);
                        }
                        next = available + 1;
                    }
                    Err(RingError::Alerted) => {
                        println!("Consumer: alerted at sequence {}, shutting down", next);
                        break;
                    }
                    Err(e) => {
                        eprintln!("Consumer: {}", e);
                        break;
                    }
                }
                if consumer.is_halted() {
                    println!("Consumer: halted at sequence {}", next);
                    break;
                }
            }
            received
        }
    });

    for burst in 0..10u32 {
        for _ in 0..100 {
            let mut entry = producer.next_entry();
            entry.value = u64::from(burst) + 1;
            producer.commit(entry);
        }
        println!(
            "Producer: burst {} published, cursor at {}",
            burst,
            producer.cursor()
        );
        // Let the worker drain and park again.
        thread::sleep(Duration::from_millis(10));
    }

    consumer.halt();
    barrier.alert();

    let received = worker.join().unwrap();
    println!("Main: consumer tallied {} across 1000 messages", received);
}
