//! Shared utilities for plantwatch.

use std::time::Duration;

/// Blocking waits behind a trait, so retry and pacing logic can run under
/// test without real sleeps.
pub trait Sleeper {
    fn sleep(&mut self, period: Duration);
}

/// Production sleeper backed by `std::thread::sleep`.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}
