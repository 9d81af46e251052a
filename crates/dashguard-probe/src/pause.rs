//! Fixed-duration suspension points.

use std::time::Duration;

/// Blocks the caller for a fixed duration. Always runs to completion.
pub trait Pause {
    fn pause(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
