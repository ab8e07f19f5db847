//! Auto-scroll timer.
//!
//! The scroll loop runs on the UI thread: the event loop waits for input
//! no longer than [`ScrollTimer::timeout`], then calls [`ScrollTimer::poll`]
//! to learn whether a step is due. Time is passed in, never read here, so
//! the timer is deterministic under test.
//!
//! A stopped timer holds no deadline, so there is at most one pending step
//! at any time and stopping takes effect immediately.

use std::time::{Duration, Instant};

/// Rows the viewport advances per scroll step.
pub const SCROLL_STEP_ROWS: usize = 1;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollTimer {
    /// When the next step is due. `None` while stopped.
    deadline: Option<Instant>,
}

impl ScrollTimer {
    /// Start scrolling. The first step is due immediately.
    ///
    /// Returns false if the timer was already running (no second loop).
    pub fn start(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now);
        true
    }

    /// Stop scrolling. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// How long the event loop may block before the next step.
    ///
    /// `None` while stopped: block until input arrives.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consume a due step, if any, and schedule the next one.
    ///
    /// The next step is scheduled `interval` after `now`, not after the
    /// missed deadline, so a stalled loop never bursts to catch up.
    pub fn poll(&mut self, now: Instant, interval: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + interval);
                true
            }
            _ => false,
        }
    }
}
