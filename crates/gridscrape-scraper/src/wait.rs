//! Deadline-bounded polling.

use std::time::{Duration, Instant};

/// Evaluates `condition` until it returns `true` or `timeout` elapses,
/// sleeping `interval` between attempts.
///
/// The condition is always evaluated at least once and once more at the
/// deadline. Returns the elapsed time on success, `None` on timeout.
pub fn poll_until<F>(timeout: Duration, interval: Duration, mut condition: F) -> Option<Duration>
where
    F: FnMut() -> bool,
{
    let started = Instant::now();
    let deadline = started + timeout;

    loop {
        if condition() {
            return Some(started.elapsed());
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        std::thread::sleep(interval.min(deadline - now));
    }
}
