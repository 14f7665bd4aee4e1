use thiserror::Error;

/// Errors that can occur when building or using a lease pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The resource factory failed while the pool was being pre-filled.
    ///
    /// Construction is atomic: when this is returned, any resources the
    /// factory had already produced have been dropped and no pool exists.
    #[error("failed to create a pooled resource: {source}")]
    ResourceCreation {
        /// The error reported by the resource factory.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A bounded wait elapsed before any resource became idle.
    ///
    /// Only the deadline-taking acquisition method returns this; the plain
    /// blocking acquisition waits indefinitely instead.
    #[error("timed out waiting for an idle resource")]
    AcquireTimeout,

    /// A lease was released into a pool other than the one that issued it.
    ///
    /// The resource is not lost when this is returned; it drains back to the
    /// pool it actually belongs to.
    #[error("lease does not belong to this pool")]
    ForeignLease,
}

/// A specialized `Result` type for lease pool operations, returning the
/// crate's [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn creation_failure_preserves_factory_error() {
        let error = Error::ResourceCreation {
            source: std::io::Error::other("connection refused").into(),
        };

        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn timeout_is_error() {
        let result: Result<()> = Err(Error::AcquireTimeout);
        assert!(result.is_err());
    }
}
