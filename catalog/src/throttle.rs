//! Leading-plus-trailing event throttling for scroll and resize cadence.
//!
//! The first event in a quiet period runs immediately; events inside the
//! window coalesce into a single deferred run at the window's end, so the
//! latest state is never dropped. Time is injected, which keeps the
//! cadence testable without real timers.

use std::time::{Duration, Instant};

/// Outcome of offering an event to the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttled {
    /// Leading edge: handle the event now.
    Run,
    /// Schedule one trailing run after the given delay.
    Deferred(Duration),
    /// A trailing run is already queued; this event folds into it.
    Coalesced,
}

#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_run: Option<Instant>,
    pending: bool,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Throttle {
            window,
            last_run: None,
            pending: false,
        }
    }

    /// Offer an event at `now`.
    pub fn event(&mut self, now: Instant) -> Throttled {
        match self.last_run {
            Some(prev) if now.duration_since(prev) < self.window => {
                if self.pending {
                    Throttled::Coalesced
                } else {
                    self.pending = true;
                    Throttled::Deferred(self.window - now.duration_since(prev))
                }
            }
            _ => {
                // Leading edge; any queued trailing run is superseded.
                self.last_run = Some(now);
                self.pending = false;
                Throttled::Run
            }
        }
    }

    /// The trailing timer fired. Returns whether the deferred run is still
    /// wanted, or was superseded by a later leading run.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self.pending {
            self.pending = false;
            self.last_run = Some(now);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn test_first_event_runs_immediately() {
        let mut throttle = Throttle::new(WINDOW);
        let t0 = Instant::now();
        assert_eq!(throttle.event(t0), Throttled::Run);
    }

    #[test]
    fn test_events_within_window_defer_then_coalesce() {
        let mut throttle = Throttle::new(WINDOW);
        let t0 = Instant::now();
        assert_eq!(throttle.event(t0), Throttled::Run);

        let t1 = t0 + Duration::from_millis(30);
        assert_eq!(throttle.event(t1), Throttled::Deferred(Duration::from_millis(70)));

        let t2 = t0 + Duration::from_millis(60);
        assert_eq!(throttle.event(t2), Throttled::Coalesced);

        // Trailing fire handles the coalesced events exactly once.
        let t3 = t0 + Duration::from_millis(100);
        assert!(throttle.fire(t3));
        assert!(!throttle.fire(t3));
    }

    #[test]
    fn test_event_after_quiet_period_runs_again() {
        let mut throttle = Throttle::new(WINDOW);
        let t0 = Instant::now();
        assert_eq!(throttle.event(t0), Throttled::Run);
        let t1 = t0 + Duration::from_millis(150);
        assert_eq!(throttle.event(t1), Throttled::Run);
    }

    #[test]
    fn test_leading_run_supersedes_queued_trailing_fire() {
        let mut throttle = Throttle::new(WINDOW);
        let t0 = Instant::now();
        assert_eq!(throttle.event(t0), Throttled::Run);
        assert!(matches!(
            throttle.event(t0 + Duration::from_millis(50)),
            Throttled::Deferred(_)
        ));

        // Window elapses before the timer callback lands; a fresh event
        // takes the leading edge and the stale timer must be a no-op.
        let t1 = t0 + Duration::from_millis(120);
        assert_eq!(throttle.event(t1), Throttled::Run);
        assert!(!throttle.fire(t1 + Duration::from_millis(1)));
    }

    #[test]
    fn test_trailing_fire_opens_new_window() {
        let mut throttle = Throttle::new(WINDOW);
        let t0 = Instant::now();
        throttle.event(t0);
        throttle.event(t0 + Duration::from_millis(10));
        let fired_at = t0 + Duration::from_millis(100);
        assert!(throttle.fire(fired_at));

        // Immediately after the trailing run we are inside a new window.
        assert!(matches!(
            throttle.event(fired_at + Duration::from_millis(10)),
            Throttled::Deferred(_)
        ));
    }
}
