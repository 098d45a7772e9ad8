/*!
 * Condvar-Based Barrier
 *
 * Arrival count and generation live under one parking_lot::Mutex. Waiters
 * sleep until the generation moves, so a spurious condvar wakeup can never
 * release a thread early.
 */

use crate::core::hints::unlikely;
use crate::core::sync::traits::RawBarrier;
use parking_lot::{Condvar, Mutex};
use tracing::trace;

struct BarrierState {
    /// Arrivals in the current trip (0 <= count < trip_count between trips)
    count: usize,
    /// Completed trips
    generation: u64,
}

pub(crate) struct CondvarBarrier {
    state: Mutex<BarrierState>,
    released: Condvar,
    trip_count: usize,
}

impl CondvarBarrier {
    pub(crate) fn new(trip_count: usize) -> Self {
        debug_assert!(trip_count > 0);
        Self {
            state: Mutex::new(BarrierState {
                count: 0,
                generation: 0,
            }),
            released: Condvar::new(),
            trip_count,
        }
    }
}

impl RawBarrier for CondvarBarrier {
    fn wait(&self) -> bool {
        let mut state = self.state.lock();
        let generation = state.generation;
        state.count += 1;

        if unlikely(state.count >= self.trip_count) {
            state.count = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            trace!(backend = "condvar", generation, "Barrier tripped");
            return true;
        }

        while state.generation == generation {
            self.released.wait(&mut state);
        }
        false
    }

    fn participants(&self) -> usize {
        self.trip_count
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}
