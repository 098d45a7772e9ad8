/*!
 * Synchronization Primitives
 *
 * Three independent primitives for coordinating worker threads:
 * - `Semaphore`: counting semaphore with blocking and absolute-deadline waits
 * - `SpinLock`: busy-wait mutual exclusion, one cache line per lock
 * - `ThreadBarrier`: cyclic rendezvous for a fixed thread cohort
 *
 * # Architecture
 *
 * Each public type owns an opaque `Box<dyn Raw*>` body selected by a factory
 * at construction time. The public layout never changes with the backend:
 * - Futex-style parking (`parking_lot_core`) on Linux
 * - Mutex/condvar pairs (`parking_lot`) everywhere else
 * - Spin-then-park and pure spin variants for low-latency callers
 *
 * # Failure Model
 *
 * Construction misuse is fatal (`new`) or checked (`try_new`). Everything
 * after construction is a caller obligation with debug-only assertions.
 */

mod barrier;
mod config;
mod deadline;
mod semaphore;
mod spinlock;
mod traits;

pub use barrier::ThreadBarrier;
pub use config::{StrategyType, SyncConfig};
pub use deadline::Deadline;
pub use semaphore::Semaphore;
pub use spinlock::{SpinLock, SpinLockGuard};

use crate::core::errors::SyncError;
use tracing::error;

/// Report construction misuse through the fatal channel and abort the caller
#[cold]
#[track_caller]
pub(crate) fn fatal(err: SyncError) -> ! {
    error!(error = %err, "Fatal synchronization primitive misuse");
    panic!("{err}")
}
