/*!
 * Condvar-Based Semaphore
 *
 * Cross-platform backend using parking_lot::Mutex + Condvar.
 * The count lives inside the mutex, so every check-then-sleep is atomic
 * with respect to `post`.
 */

use crate::core::limits::MAX_SEMAPHORE_COUNT;
use crate::core::sync::deadline::Deadline;
use crate::core::sync::traits::RawSemaphore;
use parking_lot::{Condvar, Mutex};
use tracing::trace;

pub(crate) struct CondvarSemaphore {
    count: Mutex<u32>,
    available: Condvar,
}

impl CondvarSemaphore {
    pub(crate) fn new(initial: u32) -> Self {
        Self {
            count: Mutex::new(initial),
            available: Condvar::new(),
        }
    }
}

impl RawSemaphore for CondvarSemaphore {
    fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.available.wait(&mut count);
        }
        *count -= 1;
    }

    fn wait_until(&self, deadline: Deadline) -> bool {
        let mut count = self.count.lock();
        loop {
            if *count > 0 {
                *count -= 1;
                return true;
            }

            let remaining = deadline.remaining();
            if remaining.is_zero() {
                trace!(backend = "condvar", "Semaphore wait timed out");
                return false;
            }

            // Timeout result is ignored: the loop re-checks the deadline
            self.available.wait_for(&mut count, remaining);
        }
    }

    fn try_wait(&self) -> bool {
        let mut count = self.count.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    fn post(&self) {
        {
            let mut count = self.count.lock();
            debug_assert!(*count < MAX_SEMAPHORE_COUNT, "semaphore count overflow");
            *count += 1;
        }
        self.available.notify_one();
    }

    fn available(&self) -> u32 {
        *self.count.lock()
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}
