/*!
 * Futex-Based Semaphore
 *
 * Uses parking_lot_core to park on the address of the count word.
 * On Linux, parking maps directly to futex syscalls.
 *
 * # Design
 *
 * - Lock-free fast path: a CAS loop decrements a positive count
 * - Slow path parks only after re-validating `count == 0` under the
 *   parking-lot bucket lock, so a concurrent `post` can never be missed
 * - A waiter counter lets `post` skip the unpark call when nobody sleeps
 */

use crate::core::hints::{likely, unlikely};
use crate::core::limits::MAX_SEMAPHORE_COUNT;
use crate::core::sync::deadline::Deadline;
use crate::core::sync::traits::RawSemaphore;
use parking_lot_core::{park, unpark_one, ParkResult, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
pub(crate) struct FutexSemaphore {
    count: AtomicU32,
    waiters: AtomicU32,
}

impl FutexSemaphore {
    pub(crate) const fn new(initial: u32) -> Self {
        Self {
            count: AtomicU32::new(initial),
            waiters: AtomicU32::new(0),
        }
    }

    /// Stable parking address (same as in `post`)
    #[inline]
    fn key(&self) -> usize {
        &self.count as *const AtomicU32 as usize
    }

    #[inline]
    fn try_acquire(&self) -> bool {
        let mut current = self.count.load(Ordering::Relaxed);
        while current > 0 {
            match self.count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
        false
    }

    /// Park until the count may be positive
    ///
    /// Returns `false` only if `deadline` passed without a decrement.
    pub(crate) fn acquire(&self, deadline: Option<Deadline>) -> bool {
        loop {
            if likely(self.try_acquire()) {
                return true;
            }

            let timeout = match deadline {
                Some(deadline) => {
                    if deadline.has_expired() {
                        trace!(backend = "futex", "Semaphore wait timed out");
                        return false;
                    }
                    deadline.to_instant()
                }
                None => None,
            };

            // SAFETY: the key is the address of our own count word, which
            // outlives every parked thread because waiters borrow `self`.
            // Callbacks neither panic nor call back into parking_lot.
            let result = unsafe {
                park(
                    self.key(),
                    || {
                        // Runs under the bucket lock: register before checking
                        // so `post` either sees us or we see its increment.
                        self.waiters.fetch_add(1, Ordering::SeqCst);
                        if self.count.load(Ordering::SeqCst) == 0 {
                            true
                        } else {
                            self.waiters.fetch_sub(1, Ordering::Relaxed);
                            false
                        }
                    },
                    || {},
                    |_, _| {},
                    DEFAULT_PARK_TOKEN,
                    timeout,
                )
            };

            match result {
                ParkResult::Unparked(_) | ParkResult::TimedOut => {
                    self.waiters.fetch_sub(1, Ordering::Relaxed);
                }
                ParkResult::Invalid => {}
            }
        }
    }

    pub(crate) fn release(&self) {
        let previous = self.count.fetch_add(1, Ordering::SeqCst);
        debug_assert!(previous < MAX_SEMAPHORE_COUNT, "semaphore count overflow");

        if unlikely(self.waiters.load(Ordering::SeqCst) > 0) {
            // SAFETY: same key as the parkers; the callback is trivial.
            unsafe {
                unpark_one(self.key(), |_| DEFAULT_UNPARK_TOKEN);
            }
        }
    }

    #[inline]
    pub(crate) fn try_wait(&self) -> bool {
        self.try_acquire()
    }

    #[inline]
    pub(crate) fn available(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

impl RawSemaphore for FutexSemaphore {
    fn wait(&self) {
        self.acquire(None);
    }

    fn wait_until(&self, deadline: Deadline) -> bool {
        self.acquire(Some(deadline))
    }

    fn try_wait(&self) -> bool {
        FutexSemaphore::try_wait(self)
    }

    fn post(&self) {
        self.release();
    }

    fn available(&self) -> u32 {
        FutexSemaphore::available(self)
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_futex_post_wakes_waiter() {
        let sem = Arc::new(FutexSemaphore::new(0));
        let sem_clone = sem.clone();

        let handle = thread::spawn(move || sem_clone.wait_until(Deadline::after(Duration::from_secs(5))));

        // Give thread time to park
        thread::sleep(Duration::from_millis(50));
        sem.post();

        assert!(handle.join().unwrap());
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn test_futex_timeout() {
        let sem = FutexSemaphore::new(0);
        let start = Instant::now();
        let result = sem.wait_until(Deadline::after(Duration::from_millis(50)));
        let elapsed = start.elapsed();

        assert!(!result); // Should timeout
        assert!(elapsed >= Duration::from_millis(45));
    }

    #[test]
    fn test_futex_initial_count_consumed() {
        let sem = FutexSemaphore::new(2);
        assert!(sem.try_wait());
        assert!(sem.try_wait());
        assert!(!sem.try_wait());
    }

    #[test]
    fn test_futex_post_without_waiters_skips_unpark() {
        let sem = FutexSemaphore::new(0);
        sem.post();
        assert_eq!(sem.waiters.load(Ordering::Relaxed), 0);
        assert_eq!(sem.available(), 1);
    }
}
