/*!
 * Test-and-Test-and-Set Spinlock
 *
 * Spins on a plain load until the flag looks free, then attempts the swap.
 * Contending cores share the line read-only while waiting instead of
 * bouncing it with failed writes.
 */

use crate::core::limits::CACHE_LINE_SIZE;
use crate::core::sync::traits::RawSpinLock;
use std::mem::size_of;
use std::sync::atomic::{AtomicBool, Ordering};

/// Lock flag padded to a full cache line
#[repr(C, align(64))]
pub(crate) struct TasSpinLock {
    locked: AtomicBool,
    _padding: [u8; CACHE_LINE_SIZE - size_of::<AtomicBool>()],
}

const _: () = assert!(size_of::<TasSpinLock>() == CACHE_LINE_SIZE);

impl TasSpinLock {
    pub(crate) const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
            _padding: [0; CACHE_LINE_SIZE - size_of::<AtomicBool>()],
        }
    }
}

impl RawSpinLock for TasSpinLock {
    #[inline]
    fn lock(&self) {
        loop {
            if !self.locked.swap(true, Ordering::Acquire) {
                return;
            }
            while self.locked.load(Ordering::Relaxed) {
                std::hint::spin_loop();
            }
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
        "tas"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::align_of;

    #[test]
    fn test_layout_is_one_cache_line() {
        assert_eq!(size_of::<TasSpinLock>(), CACHE_LINE_SIZE);
        assert_eq!(align_of::<TasSpinLock>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn test_adjacent_locks_do_not_share_a_line() {
        let locks = [TasSpinLock::new(), TasSpinLock::new()];
        let first = &locks[0] as *const TasSpinLock as usize;
        let second = &locks[1] as *const TasSpinLock as usize;
        assert_eq!(second - first, CACHE_LINE_SIZE);
        assert_eq!(first % CACHE_LINE_SIZE, 0);
    }

    #[test]
    fn test_try_lock_fails_while_held() {
        let lock = TasSpinLock::new();
        lock.lock();
        assert!(lock.is_locked());
        assert!(!lock.try_lock());
        unsafe { lock.unlock() };
        assert!(lock.try_lock());
        unsafe { lock.unlock() };
    }
}
