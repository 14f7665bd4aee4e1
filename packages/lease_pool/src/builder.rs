use std::iter;
use std::marker::PhantomData;
use std::num::NonZero;

use crate::error::Result;
use crate::{Error, LeasePool, Resettable};

/// Builder for configuring a [`LeasePool`].
///
/// Obtained via [`LeasePool::builder()`]. The capacity is mandatory; the
/// build methods panic if it was never set.
#[derive(Debug)]
pub struct LeasePoolBuilder<T> {
    capacity: Option<NonZero<usize>>,

    _resource: PhantomData<fn() -> T>,
}

impl<T: Resettable> LeasePoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: None,
            _resource: PhantomData,
        }
    }

    /// Sets the number of resources the pool will create and manage.
    ///
    /// The capacity is fixed for the lifetime of the pool; there is no
    /// dynamic growth.
    #[must_use]
    pub fn capacity(mut self, capacity: NonZero<usize>) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Builds the pool, pre-filling it with resources from `factory`.
    ///
    /// The factory is invoked once per unit of capacity before this returns.
    ///
    /// # Panics
    ///
    /// Panics if no capacity was set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::num::NonZero;
    ///
    /// use lease_pool::LeasePool;
    ///
    /// let pool = LeasePool::builder()
    ///     .capacity(NonZero::new(4).unwrap())
    ///     .build_with(Vec::<u8>::new);
    ///
    /// assert_eq!(pool.idle_count(), 4);
    /// ```
    #[must_use]
    pub fn build_with<F>(self, factory: F) -> LeasePool<T>
    where
        F: FnMut() -> T,
    {
        let capacity = self.require_capacity();

        let idle = iter::repeat_with(factory).take(capacity.get()).collect();

        LeasePool::from_parts(capacity, idle)
    }

    /// Builds the pool with a factory that can fail.
    ///
    /// The first factory error aborts construction: the error is returned as
    /// [`Error::ResourceCreation`], every resource created so far is
    /// dropped, and no partially-filled pool comes into existence.
    ///
    /// # Panics
    ///
    /// Panics if no capacity was set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::num::NonZero;
    ///
    /// use lease_pool::LeasePool;
    ///
    /// let result = LeasePool::<Vec<u8>>::builder()
    ///     .capacity(NonZero::new(2).unwrap())
    ///     .try_build_with(|| Err::<Vec<u8>, _>(std::io::Error::other("out of descriptors")));
    ///
    /// assert!(result.is_err());
    /// ```
    pub fn try_build_with<F, E>(self, mut factory: F) -> Result<LeasePool<T>>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let capacity = self.require_capacity();

        let mut idle = Vec::with_capacity(capacity.get());

        for _ in 0..capacity.get() {
            match factory() {
                Ok(resource) => idle.push(resource),
                Err(source) => {
                    // `idle` drops here, so a factory failure never leaves a
                    // partially usable pool behind.
                    return Err(Error::ResourceCreation {
                        source: source.into(),
                    });
                }
            }
        }

        Ok(LeasePool::from_parts(capacity, idle))
    }

    fn require_capacity(&self) -> NonZero<usize> {
        self.capacity
            .expect("a capacity must be set before building a lease pool")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::num::NonZero;

    use crate::{Error, LeasePool};

    #[test]
    fn build_with_fills_to_capacity() {
        let mut produced = 0;
        let pool = LeasePool::builder()
            .capacity(NonZero::new(3).unwrap())
            .build_with(|| {
                produced += 1;
                String::new()
            });

        assert_eq!(produced, 3);
        assert_eq!(pool.idle_count(), 3);
    }

    #[test]
    fn try_build_with_succeeds_with_healthy_factory() {
        let pool = LeasePool::builder()
            .capacity(NonZero::new(2).unwrap())
            .try_build_with(|| Ok::<_, std::io::Error>(Vec::<u8>::new()))
            .unwrap();

        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn try_build_with_fails_atomically() {
        let mut produced = 0;
        let result = LeasePool::<Vec<u8>>::builder()
            .capacity(NonZero::new(4).unwrap())
            .try_build_with(|| {
                if produced == 2 {
                    return Err(std::io::Error::other("creation failed"));
                }
                produced += 1;
                Ok(Vec::new())
            });

        assert!(matches!(result, Err(Error::ResourceCreation { .. })));
    }

    #[test]
    #[should_panic]
    fn build_without_capacity_panics() {
        let _pool = LeasePool::builder().build_with(Vec::<u8>::new);
    }
}
