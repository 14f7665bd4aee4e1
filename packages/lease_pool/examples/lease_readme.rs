//! Mirror of the README example, kept compiling.

use std::num::NonZero;

use lease_pool::LeasePool;

fn main() {
    // Four reusable byte buffers, created eagerly.
    let pool = LeasePool::new(NonZero::new(4).unwrap(), Vec::<u8>::new);

    let mut buffer = pool.acquire();
    buffer.extend_from_slice(b"work in progress");

    // Dropping the lease clears the buffer and returns it to the pool.
    drop(buffer);
    assert_eq!(pool.idle_count(), 4);

    println!("README example works as advertised.");
}
