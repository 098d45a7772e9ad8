/*!
 * Spinlock with Exponential Backoff
 *
 * After each failed acquisition the waiter issues a growing burst of
 * `spin_loop()` hints before retrying: 1, 2, 4, ... up to `backoff_cap`.
 * Under heavy contention this spreads retries out and cuts coherence
 * traffic. It never yields to the scheduler.
 */

use crate::core::limits::CACHE_LINE_SIZE;
use crate::core::sync::traits::RawSpinLock;
use std::mem::size_of;
use std::sync::atomic::{AtomicBool, Ordering};

#[repr(C, align(64))]
pub(crate) struct BackoffSpinLock {
    backoff_cap: u32,
    locked: AtomicBool,
    _padding: [u8; PADDING],
}

const PADDING: usize = CACHE_LINE_SIZE - size_of::<u32>() - size_of::<AtomicBool>();

const _: () = assert!(size_of::<BackoffSpinLock>() == CACHE_LINE_SIZE);

impl BackoffSpinLock {
    pub(crate) const fn new(backoff_cap: u32) -> Self {
        Self {
            backoff_cap,
            locked: AtomicBool::new(false),
            _padding: [0; PADDING],
        }
    }
}

impl RawSpinLock for BackoffSpinLock {
    fn lock(&self) {
        let mut step = 1u32;
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            for _ in 0..step {
                std::hint::spin_loop();
            }
            step = step.saturating_mul(2).min(self.backoff_cap);
        }
    }

    #[inline]
    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline]
    unsafe fn unlock(&self) {
        debug_assert!(
            self.locked.load(Ordering::Relaxed),
            "unlock of a spinlock that is not held"
        );
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "backoff"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_layout_is_one_cache_line() {
        assert_eq!(size_of::<BackoffSpinLock>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn test_backoff_contention() {
        let lock = Arc::new(BackoffSpinLock::new(4));
        let counter = Arc::new(std::sync::atomic::AtomicU64::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = lock.clone();
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        lock.lock();
                        // Non-atomic read-modify-write guarded by the lock
                        let value = counter.load(Ordering::Relaxed);
                        counter.store(value + 1, Ordering::Relaxed);
                        unsafe { lock.unlock() };
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.load(Ordering::Relaxed), 4000);
        assert!(!lock.is_locked());
    }
}
