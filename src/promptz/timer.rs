//! Virtual time for the sync adapters.
//!
//! The adapters never call the OS clock or spawn timers themselves. They hold
//! [`Debounce`] and [`Repeat`] values and are driven by explicit ticks with a
//! millisecond timestamp from an injected [`Clock`], so tests fast-forward
//! time instead of sleeping.

use chrono::Utc;
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Test clock. Clones share the same instant, so a test can keep a handle
/// while the application owns another.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get() + delta_ms);
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// Trailing-edge debounce: arming replaces any pending deadline, so within
/// one burst only the last scheduled write fires.
#[derive(Debug)]
pub struct Debounce {
    delay_ms: i64,
    deadline: Option<i64>,
}

impl Debounce {
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now_ms: i64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clears and reports true once the deadline has passed.
    pub fn fire_if_due(&mut self, now_ms: i64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Immediate flush of a pending deadline, due or not.
    pub fn fire_now(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

/// Fixed-interval tick, used for the external-change poll.
#[derive(Debug)]
pub struct Repeat {
    interval_ms: i64,
    next_at: Option<i64>,
}

impl Repeat {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms,
            next_at: None,
        }
    }

    pub fn start(&mut self, now_ms: i64) {
        self.next_at = Some(now_ms + self.interval_ms);
    }

    pub fn fire_if_due(&mut self, now_ms: i64) -> bool {
        match self.next_at {
            Some(next_at) if now_ms >= next_at => {
                self.next_at = Some(now_ms + self.interval_ms);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_fires_once_per_window() {
        let mut debounce = Debounce::new(2000);
        debounce.arm(0);
        assert!(!debounce.fire_if_due(1999));
        assert!(debounce.fire_if_due(2000));
        // Cleared after firing.
        assert!(!debounce.fire_if_due(5000));
    }

    #[test]
    fn rearming_replaces_the_pending_deadline() {
        let mut debounce = Debounce::new(2000);
        debounce.arm(0);
        debounce.arm(1500);
        assert!(!debounce.fire_if_due(2000));
        assert!(debounce.fire_if_due(3500));
    }

    #[test]
    fn cancel_discards_the_deadline() {
        let mut debounce = Debounce::new(2000);
        debounce.arm(0);
        debounce.cancel();
        assert!(!debounce.is_armed());
        assert!(!debounce.fire_if_due(10_000));
    }

    #[test]
    fn fire_now_flushes_only_when_armed() {
        let mut debounce = Debounce::new(2000);
        assert!(!debounce.fire_now());
        debounce.arm(0);
        assert!(debounce.fire_now());
        assert!(!debounce.fire_now());
    }

    #[test]
    fn repeat_reschedules_after_each_fire() {
        let mut poll = Repeat::new(5000);
        poll.start(0);
        assert!(!poll.fire_if_due(4999));
        assert!(poll.fire_if_due(5000));
        assert!(!poll.fire_if_due(9999));
        assert!(poll.fire_if_due(10_000));
    }

    #[test]
    fn manual_clock_handles_share_the_instant() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        handle.advance(50);
        assert_eq!(clock.now_ms(), 150);
        clock.set(1000);
        assert_eq!(handle.now_ms(), 1000);
    }
}
