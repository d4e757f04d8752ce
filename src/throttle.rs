//! Trailing-edge rate limiter for pointer moves.
//!
//! The first call in a quiet period runs immediately and starts a cooldown.
//! Calls during the cooldown are parked in a single slot (latest wins) and the
//! parked call is replayed once the cooldown expires, which starts a new
//! cooldown. Time is passed in by the caller so the event loop, not a timer
//! thread, decides when replay happens.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Ready,
    Cooling { until: Instant },
}

#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window: Duration,
    state: ThrottleState,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: ThrottleState::Ready,
            pending: None,
        }
    }

    pub fn state(&self) -> ThrottleState {
        self.state
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Offer a call. Returns the arguments to execute now, if any.
    pub fn call(&mut self, now: Instant, args: T) -> Option<T> {
        match self.state {
            ThrottleState::Cooling { until } if now < until => {
                self.pending = Some(args);
                None
            }
            _ => {
                // A newer call supersedes anything still parked.
                self.pending = None;
                self.start_cooldown(now);
                Some(args)
            }
        }
    }

    /// Replay the parked call if the cooldown has expired.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ThrottleState::Cooling { until } = self.state else {
            return None;
        };
        if now < until {
            return None;
        }
        match self.pending.take() {
            Some(args) => {
                self.start_cooldown(now);
                Some(args)
            }
            None => {
                self.state = ThrottleState::Ready;
                None
            }
        }
    }

    /// Take the parked call regardless of the cooldown and reset.
    ///
    /// Used when the gesture ends so the last pointer position is applied
    /// before the result is committed.
    pub fn flush(&mut self) -> Option<T> {
        self.state = ThrottleState::Ready;
        self.pending.take()
    }

    fn start_cooldown(&mut self, now: Instant) {
        self.state = if self.window.is_zero() {
            ThrottleState::Ready
        } else {
            ThrottleState::Cooling {
                until: now + self.window,
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(10);

    #[test]
    fn first_call_runs_immediately() {
        let mut t = Throttle::new(WINDOW);
        let now = Instant::now();
        assert_eq!(t.call(now, 1), Some(1));
        assert!(matches!(t.state(), ThrottleState::Cooling { .. }));
    }

    #[test]
    fn calls_during_cooldown_keep_only_the_latest() {
        let mut t = Throttle::new(WINDOW);
        let start = Instant::now();
        assert_eq!(t.call(start, 1), Some(1));
        assert_eq!(t.call(start + Duration::from_millis(2), 2), None);
        assert_eq!(t.call(start + Duration::from_millis(4), 3), None);
        assert!(t.has_pending());
        assert_eq!(t.poll(start + Duration::from_millis(9)), None);
        assert_eq!(t.poll(start + Duration::from_millis(10)), Some(3));
        // Replay starts a new cooldown with nothing parked.
        assert!(!t.has_pending());
        assert_eq!(t.poll(start + Duration::from_millis(20)), None);
        assert_eq!(t.state(), ThrottleState::Ready);
    }

    #[test]
    fn call_after_expiry_runs_and_drops_stale_pending() {
        let mut t = Throttle::new(WINDOW);
        let start = Instant::now();
        t.call(start, 1);
        t.call(start + Duration::from_millis(1), 2);
        assert_eq!(t.call(start + Duration::from_millis(15), 3), Some(3));
        assert!(!t.has_pending());
    }

    #[test]
    fn flush_returns_pending_and_resets() {
        let mut t = Throttle::new(WINDOW);
        let start = Instant::now();
        t.call(start, 1);
        t.call(start + Duration::from_millis(1), 2);
        assert_eq!(t.flush(), Some(2));
        assert_eq!(t.flush(), None);
        assert_eq!(t.state(), ThrottleState::Ready);
        assert_eq!(t.call(start + Duration::from_millis(2), 5), Some(5));
    }

    #[test]
    fn zero_window_never_parks() {
        let mut t = Throttle::new(Duration::ZERO);
        let now = Instant::now();
        assert_eq!(t.call(now, 1), Some(1));
        assert_eq!(t.call(now, 2), Some(2));
    }
}
