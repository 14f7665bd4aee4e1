//! Pool state and the acquire/release machinery.

use std::any::type_name;
use std::fmt;
use std::num::NonZero;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use event_listener::{Event, Listener};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::{Error, Lease, LeasePoolBuilder, Resettable};

/// Shared state behind every handle and lease of one pool.
pub(crate) struct PoolInner<T> {
    /// Resources currently available for acquisition. Last-in first-out; the
    /// pool makes no promise about which resource a caller receives.
    idle: Mutex<Vec<T>>,

    /// Signaled once per returned resource to wake one blocked acquirer.
    vacancy: Event,

    /// Number of resources created at construction. Never changes.
    capacity: NonZero<usize>,

    /// Resources still in circulation (idle or leased). Starts at `capacity`
    /// and only shrinks, when a failed reset discards a resource.
    live: AtomicUsize,
}

impl<T: Resettable> PoolInner<T> {
    fn take_idle(&self) -> Option<T> {
        self.idle.lock().pop()
    }

    /// Accepts a resource back from a finished lease.
    ///
    /// The reset runs outside the idle-set lock so that a slow reset does not
    /// serialize unrelated acquire/release pairs.
    pub(crate) fn reclaim(&self, mut resource: T) {
        if resource.reset() {
            self.idle.lock().push(resource);

            // Wake exactly one waiter. If the notified waiter has already
            // given up, the notification is forwarded to the next one, so a
            // returned resource is never missed.
            self.vacancy.notify(1);

            trace!("lease returned to pool");
        } else {
            let remaining = self
                .live
                .fetch_sub(1, Ordering::Relaxed)
                .saturating_sub(1);

            warn!(remaining, "resource failed to reset; discarding it");

            // No notification: nothing became available.
            drop(resource);
        }
    }

    fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn live_count(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }
}

impl<T> fmt::Debug for PoolInner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("capacity", &self.capacity)
            .field("idle", &self.idle.lock().len())
            .field("live", &self.live.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// A bounded pool of reusable resources with blocking acquisition.
///
/// The pool is created with a fixed capacity and eagerly pre-filled by a
/// caller-supplied factory; no resources are created afterwards. Callers
/// take resources out with [`acquire()`](Self::acquire) and its variants and
/// get back a [`Lease<T>`] that returns the resource on drop, after the
/// resource has been [reset][Resettable].
///
/// # Thread safety
///
/// The pool is a cloneable handle over shared state. Clones refer to the
/// same pool, and any number of threads may acquire and release through any
/// handle concurrently. A blocked acquirer suspends its thread; it does not
/// spin.
///
/// # Example
///
/// ```rust
/// use std::num::NonZero;
///
/// use lease_pool::LeasePool;
///
/// let pool = LeasePool::new(NonZero::new(2).unwrap(), Vec::<u8>::new);
///
/// let mut buffer = pool.acquire();
/// buffer.extend_from_slice(b"scratch data");
/// drop(buffer); // Cleared and returned to the pool.
///
/// assert_eq!(pool.idle_count(), 2);
/// ```
pub struct LeasePool<T: Resettable> {
    inner: Arc<PoolInner<T>>,
}

impl<T: Resettable> LeasePool<T> {
    /// Creates a builder for configuring and constructing a [`LeasePool`].
    ///
    /// You must specify a capacity via `.capacity()` before calling one of
    /// the build methods.
    #[must_use]
    pub fn builder() -> LeasePoolBuilder<T> {
        LeasePoolBuilder::new()
    }

    /// Creates a pool of `capacity` resources produced by `factory`.
    ///
    /// The factory is called exactly `capacity` times before this returns,
    /// so construction cost is proportional to the capacity. That is the
    /// intended trade: pay the creation cost up front, not on the hot path.
    ///
    /// For a factory that can fail, use
    /// [`builder()`](Self::builder)`.try_build_with()` instead.
    #[must_use]
    pub fn new(capacity: NonZero<usize>, factory: impl FnMut() -> T) -> Self {
        Self::builder().capacity(capacity).build_with(factory)
    }

    pub(crate) fn from_parts(capacity: NonZero<usize>, idle: Vec<T>) -> Self {
        debug_assert_eq!(idle.len(), capacity.get());

        debug!(capacity = capacity.get(), "lease pool created");

        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(idle),
                vacancy: Event::new(),
                capacity,
                live: AtomicUsize::new(capacity.get()),
            }),
        }
    }

    /// Acquires a resource, suspending the calling thread until one is idle.
    ///
    /// This never fails and imposes no bound on the wait; use
    /// [`acquire_timeout()`](Self::acquire_timeout) when the caller needs a
    /// deadline. No fairness is promised between concurrent waiters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::num::NonZero;
    ///
    /// use lease_pool::LeasePool;
    ///
    /// let pool = LeasePool::new(NonZero::new(1).unwrap(), String::new);
    ///
    /// let mut name = pool.acquire();
    /// name.push_str("scratch");
    /// ```
    #[must_use]
    pub fn acquire(&self) -> Lease<T> {
        loop {
            if let Some(resource) = self.inner.take_idle() {
                return self.lease(resource);
            }

            let listener = self.inner.vacancy.listen();

            // Re-check after registering the listener; a release between the
            // failed take and the registration would otherwise be missed.
            if let Some(resource) = self.inner.take_idle() {
                return self.lease(resource);
            }

            listener.wait();
        }
    }

    /// Acquires a resource without waiting.
    ///
    /// Returns `None` when no resource is currently idle.
    #[must_use]
    pub fn try_acquire(&self) -> Option<Lease<T>> {
        self.inner
            .take_idle()
            .map(|resource| self.lease(resource))
    }

    /// Acquires a resource, waiting at most `timeout` for one to become idle.
    ///
    /// Returns [`Error::AcquireTimeout`] when the wait elapses. A timed-out
    /// call leaves the pool untouched; it is always safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::num::NonZero;
    /// use std::time::Duration;
    ///
    /// use lease_pool::{Error, LeasePool};
    ///
    /// let pool = LeasePool::new(NonZero::new(1).unwrap(), Vec::<u8>::new);
    ///
    /// let held = pool.acquire();
    ///
    /// // The only resource is checked out, so a bounded wait fails.
    /// let result = pool.acquire_timeout(Duration::from_millis(10));
    /// assert!(matches!(result, Err(Error::AcquireTimeout)));
    ///
    /// drop(held);
    /// assert!(pool.acquire_timeout(Duration::from_millis(10)).is_ok());
    /// ```
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<Lease<T>> {
        let deadline = Instant::now().checked_add(timeout);

        loop {
            if let Some(resource) = self.inner.take_idle() {
                return Ok(self.lease(resource));
            }

            let listener = self.inner.vacancy.listen();

            if let Some(resource) = self.inner.take_idle() {
                return Ok(self.lease(resource));
            }

            match deadline {
                Some(deadline) => {
                    if listener.wait_deadline(deadline).is_none() {
                        // One final attempt; a release may have raced the
                        // expiry of the wait.
                        return self.try_acquire().ok_or(Error::AcquireTimeout);
                    }
                }
                // The deadline does not fit in the clock. Waiting forever is
                // the closest honest interpretation.
                None => listener.wait(),
            }
        }
    }

    /// Releases a lease back into this pool explicitly.
    ///
    /// Dropping the lease does the same thing; this method exists for
    /// callers that want the return to be visible in the code and to be told
    /// about misuse. Releasing a lease issued by a *different* pool is
    /// rejected with [`Error::ForeignLease`]; the resource is still returned
    /// to the pool that issued it, so no pool's accounting is disturbed.
    ///
    /// Releasing the same lease twice is not expressible: a lease is
    /// consumed by release and returns its resource at most once.
    pub fn release(&self, lease: Lease<T>) -> Result<()> {
        let foreign = !Arc::ptr_eq(&self.inner, lease.pool());

        // Either way the resource drains back to its owning pool here.
        drop(lease);

        if foreign {
            return Err(Error::ForeignLease);
        }

        Ok(())
    }

    /// The number of resources the pool was created with.
    #[must_use]
    pub fn capacity(&self) -> NonZero<usize> {
        self.inner.capacity
    }

    /// The number of resources currently idle and available for acquisition.
    ///
    /// This is a snapshot; concurrent acquires and releases may change it
    /// before the caller can act on it.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.inner.idle_count()
    }

    /// The number of resources still in circulation, idle or leased.
    ///
    /// Starts at the capacity and shrinks only when a resource fails to
    /// reset on release and is discarded.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.live_count()
    }

    fn lease(&self, resource: T) -> Lease<T> {
        trace!("lease handed out");
        Lease::new(resource, Arc::clone(&self.inner))
    }
}

impl<T: Resettable> Clone for LeasePool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Resettable> fmt::Debug for LeasePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("capacity", &self.inner.capacity)
            .field("idle", &self.inner.idle_count())
            .field("live", &self.inner.live_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;
    use std::time::Duration;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(LeasePool<Vec<u8>>: Clone, Debug, Send, Sync);
    assert_impl_all!(Lease<Vec<u8>>: Debug, Send);

    const TWO: NonZero<usize> = NonZero::new(2).unwrap();

    /// A resource whose identity survives reset but whose payload does not.
    struct Tagged {
        id: usize,
        payload: Vec<u8>,
        reset_works: bool,
    }

    impl Resettable for Tagged {
        fn reset(&mut self) -> bool {
            self.payload.clear();
            self.reset_works
        }
    }

    fn tagged_pool(capacity: NonZero<usize>) -> LeasePool<Tagged> {
        let mut next_id = 0;
        LeasePool::new(capacity, move || {
            let id = next_id;
            next_id += 1;
            Tagged {
                id,
                payload: Vec::new(),
                reset_works: true,
            }
        })
    }

    #[test]
    fn fresh_pool_is_fully_idle() {
        let pool = tagged_pool(TWO);

        assert_eq!(pool.capacity(), TWO);
        assert_eq!(pool.idle_count(), 2);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn yields_exactly_capacity_immediate_acquisitions() {
        let pool = tagged_pool(TWO);

        let first = pool.try_acquire();
        let second = pool.try_acquire();
        let third = pool.try_acquire();

        assert!(first.is_some());
        assert!(second.is_some());
        assert!(third.is_none());
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn distinct_resources_are_handed_out() {
        let pool = tagged_pool(TWO);

        let first = pool.acquire();
        let second = pool.acquire();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn released_resource_comes_back_reset() {
        let pool = tagged_pool(NonZero::new(1).unwrap());

        let mut lease = pool.acquire();
        let original_id = lease.id;
        lease.payload.extend_from_slice(b"holder data");
        drop(lease);

        let reacquired = pool.acquire();
        assert_eq!(reacquired.id, original_id);
        assert!(reacquired.payload.is_empty());
    }

    #[test]
    fn dropping_lease_returns_resource() {
        let pool = tagged_pool(TWO);

        let lease = pool.acquire();
        assert_eq!(pool.idle_count(), 1);

        drop(lease);
        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn explicit_release_accepts_own_lease() {
        let pool = tagged_pool(TWO);

        let lease = pool.acquire();
        pool.release(lease).unwrap();

        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn foreign_lease_is_rejected_but_not_lost() {
        let pool = tagged_pool(TWO);
        let other = tagged_pool(TWO);

        let lease = other.acquire();
        assert_eq!(other.idle_count(), 1);

        let result = pool.release(lease);
        assert!(matches!(result, Err(Error::ForeignLease)));

        // The wrongly-released resource drained back to its issuing pool.
        assert_eq!(other.idle_count(), 2);
        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn failed_reset_discards_resource() {
        let pool = tagged_pool(TWO);

        let mut lease = pool.acquire();
        lease.reset_works = false;
        drop(lease);

        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.idle_count(), 1);

        // The survivor keeps circulating as normal.
        let survivor = pool.acquire();
        drop(survivor);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn clones_share_the_same_pool() {
        let pool = tagged_pool(TWO);
        let handle = pool.clone();

        let lease = pool.acquire();
        assert_eq!(handle.idle_count(), 1);

        handle.release(lease).unwrap();
        assert_eq!(pool.idle_count(), 2);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn acquire_timeout_fails_when_exhausted() {
        let pool = tagged_pool(NonZero::new(1).unwrap());

        let _held = pool.acquire();

        let result = pool.acquire_timeout(Duration::from_millis(10));
        assert!(matches!(result, Err(Error::AcquireTimeout)));

        // The failed wait did not disturb the accounting.
        assert_eq!(pool.live_count(), 1);
        assert_eq!(pool.idle_count(), 0);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn acquire_timeout_succeeds_when_idle() {
        let pool = tagged_pool(TWO);

        let lease = pool.acquire_timeout(Duration::from_millis(10)).unwrap();
        drop(lease);

        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn debug_output_names_the_counters() {
        let pool = tagged_pool(TWO);
        let _held = pool.acquire();

        let rendered = format!("{pool:?}");

        assert!(rendered.contains("capacity"));
        assert!(rendered.contains("idle"));
        assert!(rendered.contains("live"));
    }
}
