#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in lease_pool packages.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Runs a test under a watchdog with the default leash.
///
/// The tests in this workspace exercise operations that legitimately block
/// the calling thread. A bug in the wake-up path therefore shows up as a
/// hang, not a failure; the watchdog converts such hangs into test failures
/// instead of wedging the build.
///
/// The leash is 10 seconds normally and 60 seconds under Miri, where thread
/// synchronization runs far slower.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the
/// watchdog is disabled and the closure runs directly, so mutation testing
/// can observe hanging mutations itself.
///
/// # Panics
///
/// Panics if the test exceeds the leash (when not in mutation testing mode).
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// with_watchdog(|| {
///     // Test code that is expected to finish promptly.
///     assert_eq!(2 + 2, 4);
/// });
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let leash = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    };

    with_watchdog_leash(leash, test_fn)
}

/// Runs a test under a watchdog with a caller-chosen leash.
///
/// Use this when a test intentionally waits (for example, proving that an
/// acquisition really does block) and the default leash would hide a slow
/// regression.
///
/// # Panics
///
/// Panics if the test exceeds the leash (when not in mutation testing mode).
pub fn with_watchdog_leash<F, R>(leash: Duration, test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        // Under mutation testing, hangs must stay observable.
        return test_fn();
    }

    let (result_tx, result_rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        // A send failure means the watchdog already gave up on us; there is
        // nobody left to hand the result to.
        drop(result_tx.send(test_fn()));
    });

    match result_rx.recv_timeout(leash) {
        Ok(result) => {
            test_handle.join().expect("test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded its {}-second watchdog leash", leash.as_secs());
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread disconnected without reporting a result"),
            Err(payload) => std::panic::resume_unwind(payload),
        },
    }
}
