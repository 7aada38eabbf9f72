//! Per-command cooldown gate for rate limiting command usage.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Tracks the last invocation time of a single command.
///
/// The first invocation is always allowed and starts the timer. After that
/// a call is allowed iff the window has elapsed since the last *allowed*
/// call; an allowed call resets the window, a rejected call does not.
#[derive(Debug)]
pub struct CooldownGate {
    window: Duration,
    last_started: Mutex<Option<Instant>>,
}

impl CooldownGate {
    /// Creates a gate with the given window. A zero window never throttles.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_started: Mutex::new(None),
        }
    }

    /// Returns the configured window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Checks whether an invocation at `now` is allowed, starting or
    /// restarting the window as a side effect when it is.
    ///
    /// The check-and-set is atomic over the timestamp, so two concurrent
    /// callers cannot both observe an unstarted timer.
    pub fn check_and_start(&self, now: Instant) -> bool {
        let mut last = self.last_started.lock();
        match *last {
            None => {
                *last = Some(now);
                true
            }
            Some(started) => {
                if now.duration_since(started) >= self.window {
                    *last = Some(now);
                    true
                } else {
                    false
                }
            }
        }
    }
}
