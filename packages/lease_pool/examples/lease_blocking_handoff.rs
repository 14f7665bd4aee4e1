//! Example demonstrating the blocking handoff between concurrent workers.
//!
//! Six workers contend for a pool of two resources. Each worker suspends
//! until a resource is free, uses it briefly, then returns it; the console
//! output shows that no more than two workers ever hold a resource at once.

use std::num::NonZero;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lease_pool::LeasePool;

fn main() {
    let pool: LeasePool<String> = LeasePool::new(NonZero::new(2).unwrap(), String::new);
    let holders = Arc::new(AtomicUsize::new(0));

    println!("Six workers, two resources. Watch the holder count.");

    let workers: Vec<_> = (1..=6)
        .map(|worker| {
            let pool = pool.clone();
            let holders = Arc::clone(&holders);
            thread::spawn(move || {
                // Suspends until one of the two resources is free.
                let mut scratch = pool.acquire();

                let now_holding = holders.fetch_add(1, Ordering::SeqCst) + 1;
                println!("worker {worker} acquired ({now_holding} holding)");

                scratch.push_str("intermediate state the next worker must never see");
                thread::sleep(Duration::from_millis(150));

                holders.fetch_sub(1, Ordering::SeqCst);
                println!("worker {worker} releasing");
                drop(scratch);
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    println!("All done. Idle again: {}", pool.idle_count());
}
