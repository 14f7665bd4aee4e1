/// A resource that can be restored to a ready-to-reuse state.
///
/// A [`LeasePool`][crate::LeasePool] calls [`reset()`](Self::reset) on every
/// resource as it is returned, before the resource re-enters the idle set.
/// After a successful reset the resource must carry no state observable by
/// the next holder; whatever the previous holder did to it is gone.
///
/// Reset is required to be idempotent: resetting an already-reset resource
/// must leave it in the same observable state as resetting it once.
///
/// # Failure
///
/// Returning `false` signals that the resource could not be restored (for
/// example, a connection that has become unusable). The pool discards such a
/// resource instead of handing it to the next caller, permanently reducing
/// the number of resources in circulation. Prefer this over returning a
/// resource whose state you cannot vouch for.
///
/// # Example
///
/// ```rust
/// use lease_pool::Resettable;
///
/// struct Canvas {
///     pixels: Vec<u32>,
/// }
///
/// impl Resettable for Canvas {
///     fn reset(&mut self) -> bool {
///         self.pixels.fill(0);
///         true
///     }
/// }
/// ```
pub trait Resettable {
    /// Restores the resource to its ready-to-reuse state.
    ///
    /// Returns `false` if the resource could not be restored, in which case
    /// the pool discards it.
    fn reset(&mut self) -> bool;
}

/// Clears the contents while retaining the allocation, which is the whole
/// point of pooling a buffer.
impl<T> Resettable for Vec<T> {
    fn reset(&mut self) -> bool {
        self.clear();
        true
    }
}

/// Clears the contents while retaining the allocation.
impl Resettable for String {
    fn reset(&mut self) -> bool {
        self.clear();
        true
    }
}
