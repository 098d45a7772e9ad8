/*!
 * Adaptive Spin-Wait Semaphore
 *
 * Optimized for hand-offs where the matching `post` usually lands within a
 * few microseconds. Spins before falling back to futex parking:
 *
 * 1. **Tight spin phase** (first `TIGHT_SPIN_ITERATIONS`): `spin_loop()` hint
 * 2. **Yield phase** (up to `spin_limit`): `yield_now()` every iteration
 * 3. **Park phase**: delegate to the futex backend
 */

use super::futex::FutexSemaphore;
use crate::core::limits::TIGHT_SPIN_ITERATIONS;
use crate::core::sync::deadline::Deadline;
use crate::core::sync::traits::RawSemaphore;
use std::thread;

/// Spin-then-park semaphore
///
/// # Performance
///
/// - Ultra-low latency for short waits (< 10µs)
/// - Higher CPU usage during the spin window
/// - Parks like the futex backend for long waits
pub(crate) struct SpinWaitSemaphore {
    /// Parking fallback, also owns the count
    fallback: FutexSemaphore,
    /// Spin iterations before parking
    spin_limit: u32,
}

impl SpinWaitSemaphore {
    pub(crate) fn new(initial: u32, spin_limit: u32) -> Self {
        Self {
            fallback: FutexSemaphore::new(initial),
            spin_limit,
        }
    }

    /// Spin until the count can be taken or the budget runs out
    ///
    /// Returns `true` if the count was decremented while spinning.
    fn spin(&self, deadline: Option<Deadline>) -> bool {
        for spin_count in 0..self.spin_limit {
            if self.fallback.try_wait() {
                return true;
            }

            if spin_count < TIGHT_SPIN_ITERATIONS {
                std::hint::spin_loop();
            } else {
                if deadline.is_some_and(|d| d.has_expired()) {
                    return false;
                }
                thread::yield_now();
            }
        }
        false
    }
}

impl RawSemaphore for SpinWaitSemaphore {
    fn wait(&self) {
        if !self.spin(None) {
            self.fallback.acquire(None);
        }
    }

    fn wait_until(&self, deadline: Deadline) -> bool {
        self.spin(Some(deadline)) || self.fallback.acquire(Some(deadline))
    }

    fn try_wait(&self) -> bool {
        self.fallback.try_wait()
    }

    fn post(&self) {
        self.fallback.release();
    }

    fn available(&self) -> u32 {
        self.fallback.available()
    }

    fn name(&self) -> &'static str {
        "spinwait"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::limits::DEFAULT_SPIN_LIMIT;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_spinwait_timeout() {
        let sem = SpinWaitSemaphore::new(0, DEFAULT_SPIN_LIMIT);
        let start = Instant::now();
        let result = sem.wait_until(Deadline::after(Duration::from_millis(50)));
        let elapsed = start.elapsed();

        assert!(!result);
        assert!(elapsed >= Duration::from_millis(45));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn test_spinwait_wake_after_park() {
        let sem = Arc::new(SpinWaitSemaphore::new(0, 16));
        let sem_clone = sem.clone();

        let handle = thread::spawn(move || sem_clone.wait());

        // Long enough that the waiter has exhausted its spin budget
        thread::sleep(Duration::from_millis(100));
        sem.post();

        handle.join().unwrap();
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn test_spinwait_immediate_count() {
        let sem = SpinWaitSemaphore::new(1, DEFAULT_SPIN_LIMIT);
        assert!(sem.wait_until(Deadline::now()));
        assert!(!sem.try_wait());
    }
}
