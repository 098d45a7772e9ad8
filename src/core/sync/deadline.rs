/*!
 * Absolute Deadlines
 *
 * Wall-clock points in time for `Semaphore::timed_wait`. Waiters recompute the
 * time left from the deadline after every wakeup, so repeated spurious
 * wakeups never stretch the total wait.
 */

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Absolute point in wall-clock time (seconds + nanoseconds since the UNIX epoch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline {
    since_epoch: Duration,
}

impl Deadline {
    /// Deadline at `secs` seconds plus `nanos` nanoseconds after the UNIX epoch
    ///
    /// Nanoseconds beyond one second carry into the seconds field.
    pub fn from_timespec(secs: u64, nanos: u32) -> Self {
        let carry = u64::from(nanos / 1_000_000_000);
        Self {
            since_epoch: Duration::new(secs.saturating_add(carry), nanos % 1_000_000_000),
        }
    }

    /// The current wall-clock time as a deadline (already expired)
    pub fn now() -> Self {
        Self {
            since_epoch: wall_clock(),
        }
    }

    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self {
            since_epoch: wall_clock().saturating_add(timeout),
        }
    }

    /// Seconds and nanoseconds since the UNIX epoch
    pub fn as_timespec(&self) -> (u64, u32) {
        (self.since_epoch.as_secs(), self.since_epoch.subsec_nanos())
    }

    /// Time left until the deadline, zero once it has passed
    #[inline]
    pub fn remaining(&self) -> Duration {
        self.since_epoch.saturating_sub(wall_clock())
    }

    #[inline]
    pub fn has_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Monotonic instant for parking APIs, recomputed against the wall clock
    ///
    /// Returns `None` when the deadline lies too far out to represent, which
    /// callers treat as "no timeout".
    #[inline]
    pub(crate) fn to_instant(&self) -> Option<Instant> {
        Instant::now().checked_add(self.remaining())
    }
}

impl From<SystemTime> for Deadline {
    fn from(time: SystemTime) -> Self {
        Self {
            since_epoch: time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO),
        }
    }
}

impl From<Deadline> for SystemTime {
    fn from(deadline: Deadline) -> Self {
        UNIX_EPOCH
            .checked_add(deadline.since_epoch)
            .unwrap_or(UNIX_EPOCH)
    }
}

fn wall_clock() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timespec_roundtrip_normalizes_nanos() {
        let deadline = Deadline::from_timespec(10, 1_500_000_000);
        assert_eq!(deadline.as_timespec(), (11, 500_000_000));
    }

    #[test]
    fn test_past_deadline_has_expired() {
        let deadline = Deadline::from_timespec(1, 0);
        assert!(deadline.has_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_future_deadline_remaining() {
        let deadline = Deadline::after(Duration::from_secs(60));
        let remaining = deadline.remaining();
        assert!(remaining > Duration::from_secs(59));
        assert!(remaining <= Duration::from_secs(60));
        assert!(!deadline.has_expired());
    }

    #[test]
    fn test_system_time_conversion() {
        let time = UNIX_EPOCH + Duration::new(1_700_000_000, 42);
        let deadline = Deadline::from(time);
        assert_eq!(deadline.as_timespec(), (1_700_000_000, 42));
        assert_eq!(SystemTime::from(deadline), time);
    }

    #[test]
    fn test_ordering() {
        assert!(Deadline::from_timespec(5, 0) < Deadline::from_timespec(5, 1));
    }
}
