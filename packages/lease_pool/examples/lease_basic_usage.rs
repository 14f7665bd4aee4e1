//! Example demonstrating basic usage of `LeasePool` with reusable buffers.
//!
//! This shows the ordinary single-threaded flow: build, acquire, mutate,
//! return, reacquire the same (now reset) allocation.

use std::num::NonZero;

use lease_pool::LeasePool;

fn main() {
    println!("=== LeasePool: Fixed Capacity, Reset on Return ===");

    // Two reusable byte buffers, created eagerly up front.
    let pool: LeasePool<Vec<u8>> =
        LeasePool::new(NonZero::new(2).unwrap(), || Vec::with_capacity(4096));

    println!("Idle after construction: {}", pool.idle_count());

    let mut buffer = pool.acquire();
    buffer.extend_from_slice(b"pretend this is an expensive serialization");
    println!("Wrote {} bytes into a leased buffer", buffer.len());
    println!("Idle while leased: {}", pool.idle_count());

    // Dropping the lease clears the buffer and hands it back.
    drop(buffer);
    println!("Idle after return: {}", pool.idle_count());

    let reused = pool.acquire();
    println!(
        "Reacquired buffer: {} bytes of content, {} bytes of retained capacity",
        reused.len(),
        reused.capacity()
    );
}
