//! Rate limiting for log messages.
//!
//! Some data anomalies (pathological street costs) can occur thousands of
//! times while building one transfer index. They are worth one log line, not
//! thousands, so callers ask a `Throttle` before logging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lets one event through per quiet period; thread safe and lock free.
#[derive(Debug)]
pub struct Throttle {
    origin: Instant,
    quiet_period: Duration,
    /// Milliseconds since `origin` of the last event let through, plus one.
    /// Zero means no event has been let through yet.
    last: AtomicU64,
}

impl Throttle {
    /// Create a throttle letting through at most one event per `quiet_period`.
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            origin: Instant::now(),
            quiet_period,
            last: AtomicU64::new(0),
        }
    }

    /// Returns true if the caller should emit its event now.
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    fn allow_at(&self, now: Instant) -> bool {
        let now_ms = now.saturating_duration_since(self.origin).as_millis() as u64 + 1;
        let quiet_ms = self.quiet_period.as_millis() as u64;
        let last = self.last.load(Ordering::Relaxed);

        if last != 0 && now_ms < last.saturating_add(quiet_ms) {
            return false;
        }
        // Only the thread winning the exchange logs.
        self.last
            .compare_exchange(last, now_ms, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_event_passes() {
        let throttle = Throttle::new(Duration::from_secs(60));
        assert!(throttle.allow());
    }

    #[test]
    fn events_inside_quiet_period_are_suppressed() {
        let throttle = Throttle::new(Duration::from_secs(60));
        let start = throttle.origin;
        assert!(throttle.allow_at(start));
        assert!(!throttle.allow_at(start + Duration::from_secs(1)));
        assert!(!throttle.allow_at(start + Duration::from_secs(59)));
    }

    #[test]
    fn events_after_quiet_period_pass_again() {
        let throttle = Throttle::new(Duration::from_secs(10));
        let start = throttle.origin;
        assert!(throttle.allow_at(start));
        assert!(throttle.allow_at(start + Duration::from_secs(10)));
        assert!(!throttle.allow_at(start + Duration::from_secs(11)));
        assert!(throttle.allow_at(start + Duration::from_secs(21)));
    }

    #[test]
    fn zero_quiet_period_never_suppresses() {
        let throttle = Throttle::new(Duration::ZERO);
        let start = throttle.origin;
        assert!(throttle.allow_at(start));
        assert!(throttle.allow_at(start));
        assert!(throttle.allow_at(start + Duration::from_millis(5)));
    }
}
