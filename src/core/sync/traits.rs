/*!
 * Synchronization Traits
 *
 * Implementation-body contracts behind the public primitives. Every backend
 * of a primitive implements the same trait, and the public type only ever
 * talks to a `Box<dyn Raw*>`, so the public layout is backend-independent.
 */

use super::deadline::Deadline;

/// Counting semaphore body
///
/// Implementations must:
/// - never let the count go negative
/// - wake at most one waiter per `post`
/// - give `post` Release and successful waits Acquire semantics
pub(crate) trait RawSemaphore: Send + Sync {
    /// Block until the count is positive, then decrement it
    fn wait(&self);

    /// Like `wait`, giving up once `deadline` passes
    ///
    /// Returns `true` if the count was decremented, `false` on timeout.
    fn wait_until(&self, deadline: Deadline) -> bool;

    /// Decrement without blocking
    fn try_wait(&self) -> bool;

    /// Increment and wake one waiter if any
    fn post(&self);

    /// Approximate count (for diagnostics)
    fn available(&self) -> u32;

    /// Get backend name for debugging
    fn name(&self) -> &'static str;
}

/// Spinlock body
pub(crate) trait RawSpinLock: Send + Sync {
    /// Busy-wait until the lock is acquired
    fn lock(&self);

    /// Single acquisition attempt
    fn try_lock(&self) -> bool;

    /// Release the lock
    ///
    /// # Safety
    ///
    /// The caller must hold the lock.
    unsafe fn unlock(&self);

    /// Snapshot of the lock flag (for diagnostics)
    fn is_locked(&self) -> bool;

    /// Get backend name for debugging
    fn name(&self) -> &'static str;
}

/// Barrier body
pub(crate) trait RawBarrier: Send + Sync {
    /// Arrive and block until the trip completes
    ///
    /// Returns `true` for exactly one arrival per trip: the one that completed it.
    fn wait(&self) -> bool;

    /// Number of arrivals that complete a trip
    fn participants(&self) -> usize;

    /// Get backend name for debugging
    fn name(&self) -> &'static str;
}
