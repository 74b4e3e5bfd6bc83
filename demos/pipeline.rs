// In-process pipeline demo: a producer publishes checksummed messages
// through the ring, a verify stage recomputes every digest, and a tally
// stage (gating the producer) aggregates the values.
//
// Usage: cargo run --release --example pipeline [total_messages] [ring_size]

use msgring::{Consumer, Entry, RingBuffer, SequenceConsumer};
use sha2::{Digest, Sha256};
use std::env;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

struct MessageEntry {
    sequence: i64,
    value: u64,
    digest: [u8; 32],
}

impl Default for MessageEntry {
    fn default() -> Self {
        Self {
            sequence: -1,
            value: 0,
            digest: [0; 32],
        }
    }
}

impl Entry for MessageEntry {
    fn sequence(&self) -> i64 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: i64) {
        self.sequence = sequence;
    }
}

fn digest_of(value: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(value.to_le_bytes());
    hasher.finalize().into()
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let total: i64 = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_000_000);
    let size: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(8192);

    let ring = RingBuffer::new(MessageEntry::default, size);
    println!(
        "Pipeline: {} messages through {} slots",
        total,
        ring.capacity()
    );

    // Precompute digests so the publish loop measures ring throughput,
    // not hashing.
    let start_precompute = Instant::now();
    let digests: Vec<[u8; 32]> = (0..total).map(|i| digest_of(i as u64 * 31)).collect();
    println!(
        "Pipeline: precomputed {} digests in {:.2?}",
        total,
        start_precompute.elapsed()
    );

    let verify = Arc::new(SequenceConsumer::new());
    let tally = Arc::new(SequenceConsumer::new());

    let producer = ring
        .producer_barrier(vec![tally.clone() as Arc<dyn Consumer>])
        .unwrap();
    let verify_barrier = Arc::new(ring.consumer_barrier(vec![]));
    let tally_barrier = Arc::new(ring.consumer_barrier(vec![verify.clone() as Arc<dyn Consumer>]));

    let verify_thread = thread::spawn({
        let barrier = verify_barrier.clone();
        let stage = verify.clone();
        move || {
            let mut mismatches = 0u64;
            let mut next = 0i64;
            while next < total {
                let available = barrier.wait_for(next).expect("verify stage alerted");
                for sequence in next..=available {
                    let entry = barrier.entry(sequence);
                    if entry.digest != digest_of(entry.value) {
                        mismatches += 1;
                    }
                    stage.advance_to(sequence);
                }
                next = available + 1;
            }
            mismatches
        }
    });

    let tally_thread = thread::spawn({
        let barrier = tally_barrier.clone();
        let stage = tally.clone();
        move || {
            let mut sum = 0u64;
            let mut next = 0i64;
            while next < total {
                let available = barrier.wait_for(next).expect("tally stage alerted");
                for sequence in next..=available {
                    sum += barrier.entry(sequence).value;
                    stage.advance_to(sequence);
                }
                next = available + 1;
            }
            sum
        }
    });

    let start_publish = Instant::now();
    for i in 0..total {
        let mut entry = producer.next_entry();
        entry.value = i as u64 * 31;
        entry.digest = digests[i as usize];
        producer.commit(entry);
    }

    let mismatches = verify_thread.join().unwrap();
    let sum = tally_thread.join().unwrap();
    let elapsed = start_publish.elapsed();

    let expected: u64 = (0..total as u64).map(|i| i * 31).sum();

    println!("\n{}", "=".repeat(64));
    println!("PIPELINE STATISTICS");
    println!("{}", "=".repeat(64));
    println!("Messages published:  {}", total);
    println!("Ring capacity:       {} slots", ring.capacity());
    println!("Digest mismatches:   {}", mismatches);
    println!("Tally:               {} (expected {})", sum, expected);
    println!("Time taken:          {:.3?}", elapsed);
    println!(
        "Throughput:          {:.2} million msgs/sec",
        (total as f64 / elapsed.as_secs_f64()) / 1_000_000.0
    );
    println!("{}", "=".repeat(64));

    assert_eq!(mismatches, 0);
    assert_eq!(sum, expected);
}
