#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A bounded pool of reusable resources with blocking acquisition.
//!
//! This crate provides [`LeasePool`], a thread-safe pool that creates a
//! fixed number of resources up front and hands them out one holder at a
//! time. It exists for resources that are expensive to construct and cheap
//! to restore: buffers, session objects, I/O-backed state.
//!
//! This is part of the [Folo project](https://github.com/folo-rs/folo) that provides mechanisms
//! for high-performance hardware-aware programming in Rust.
//!
//! # Quick start
//!
//! ```rust
//! use std::num::NonZero;
//!
//! use lease_pool::LeasePool;
//!
//! // Four reusable byte buffers, created eagerly.
//! let pool = LeasePool::new(NonZero::new(4).unwrap(), Vec::<u8>::new);
//!
//! let mut buffer = pool.acquire();
//! buffer.extend_from_slice(b"work in progress");
//!
//! // Dropping the lease clears the buffer and returns it to the pool.
//! drop(buffer);
//! assert_eq!(pool.idle_count(), 4);
//! ```
//!
//! # Key behaviors
//!
//! - **Fixed capacity**: all resources are created at construction by a
//!   caller-supplied factory; the pool never grows.
//! - **Blocking handout**: [`LeasePool::acquire()`] suspends the calling
//!   thread until a resource is idle. [`LeasePool::try_acquire()`] and
//!   [`LeasePool::acquire_timeout()`] cover the non-blocking and
//!   bounded-wait cases.
//! - **Reset on return**: every resource passes through
//!   [`Resettable::reset()`] before re-entering circulation, so no holder
//!   ever observes a previous holder's state. A resource that fails to reset
//!   is discarded rather than recirculated.
//! - **One holder per resource**: a [`Lease`] is the only access path, and
//!   a lease cannot be duplicated.
//!
//! # Picking a capacity
//!
//! Capacity bounds both memory (resources exist even when idle) and
//! concurrency (the capacity-plus-first excess acquirer blocks). Size it to
//! the number of concurrent holders you actually want to allow, not to the
//! peak request rate.
//!
//! # Thread safety
//!
//! [`LeasePool`] is a cloneable handle; clones address the same pool, and
//! all operations are safe under arbitrary concurrent use. Waiting callers
//! are suspended by the OS, not spun.

mod builder;
mod error;
mod lease;
mod pool;
mod resettable;

pub use builder::*;
pub use error::*;
pub use lease::*;
pub(crate) use pool::PoolInner;
pub use pool::*;
pub use resettable::*;
