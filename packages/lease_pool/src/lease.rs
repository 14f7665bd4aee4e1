use std::any::type_name;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::{PoolInner, Resettable};

/// One checked-out resource from a [`LeasePool`][crate::LeasePool].
///
/// A lease is the only way to hold a pooled resource: while it exists, no
/// other caller can observe the resource. Access the resource through
/// [`Deref`] and [`DerefMut`].
///
/// Dropping the lease resets the resource and returns it to the issuing
/// pool, waking one blocked acquirer if any are waiting. A lease cannot be
/// cloned, so a resource cannot be returned twice.
///
/// The lease keeps the pool state alive; it is fine for the lease to outlive
/// every [`LeasePool`][crate::LeasePool] handle.
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
/// let mut greeting = pool.acquire();
/// greeting.push_str("hello");
/// assert_eq!(greeting.len(), 5);
///
/// drop(greeting); // Reset and returned; the next holder sees an empty string.
/// assert!(pool.acquire().is_empty());
/// ```
pub struct Lease<T: Resettable> {
    /// Present from construction until the drop or an explicit release takes
    /// it back out.
    resource: Option<T>,

    pool: Arc<PoolInner<T>>,
}

impl<T: Resettable> Lease<T> {
    pub(crate) fn new(resource: T, pool: Arc<PoolInner<T>>) -> Self {
        Self {
            resource: Some(resource),
            pool,
        }
    }

    /// Identifies the pool this lease was issued by.
    pub(crate) fn pool(&self) -> &Arc<PoolInner<T>> {
        &self.pool
    }
}

impl<T: Resettable> Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.resource
            .as_ref()
            .expect("resource is present until the lease is consumed")
    }
}

impl<T: Resettable> DerefMut for Lease<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.resource
            .as_mut()
            .expect("resource is present until the lease is consumed")
    }
}

impl<T: Resettable> Drop for Lease<T> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.reclaim(resource);
        }
    }
}

impl<T: Resettable> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>()).finish_non_exhaustive()
    }
}
