/*!
 * Futex-Based Barrier
 *
 * Lock-free arrival counting with parking_lot_core parking on the address of
 * the generation word.
 *
 * # Design
 *
 * - Each arrival snapshots the generation, then bumps the arrival counter
 * - The arrival that completes the trip resets the counter, publishes the
 *   next generation with Release ordering and unparks every sleeper
 * - Sleepers re-validate the generation under the bucket lock, so a release
 *   racing with `park` is never lost
 */

use crate::core::hints::unlikely;
use crate::core::sync::traits::RawBarrier;
use parking_lot_core::{park, unpark_all, DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use tracing::trace;

#[repr(C, align(64))]
pub(crate) struct FutexBarrier {
    arrived: AtomicUsize,
    generation: AtomicU32,
    trip_count: usize,
}

impl FutexBarrier {
    pub(crate) const fn new(trip_count: usize) -> Self {
        Self {
            arrived: AtomicUsize::new(0),
            generation: AtomicU32::new(0),
            trip_count,
        }
    }

    #[inline]
    fn key(&self) -> usize {
        &self.generation as *const AtomicU32 as usize
    }
}

impl RawBarrier for FutexBarrier {
    fn wait(&self) -> bool {
        let generation = self.generation.load(Ordering::Acquire);
        let arrived = self.arrived.fetch_add(1, Ordering::AcqRel) + 1;

        if unlikely(arrived == self.trip_count) {
            self.arrived.store(0, Ordering::Relaxed);
            self.generation.fetch_add(1, Ordering::Release);
            // SAFETY: key is our own generation word; callback is trivial.
            let unparked = unsafe { unpark_all(self.key(), DEFAULT_UNPARK_TOKEN) };
            trace!(backend = "futex", generation, unparked, "Barrier tripped");
            return true;
        }

        while self.generation.load(Ordering::Acquire) == generation {
            // SAFETY: the key outlives every parked thread because waiters
            // borrow `self`; callbacks neither panic nor re-enter parking_lot.
            unsafe {
                park(
                    self.key(),
                    || self.generation.load(Ordering::Acquire) == generation,
                    || {},
                    |_, _| {},
                    DEFAULT_PARK_TOKEN,
                    None,
                );
            }
        }
        false
    }

    fn participants(&self) -> usize {
        self.trip_count
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}
