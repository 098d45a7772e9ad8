/*!
 * Cache-Line Padded Spinlock
 *
 * Busy-wait mutual exclusion for critical sections of a few instructions up
 * to a few microseconds. No FIFO fairness: under heavy contention a thread
 * may starve, in exchange for low latency under light contention.
 */

mod backoff;
mod tas;

use self::backoff::BackoffSpinLock;
use self::tas::TasSpinLock;
use super::config::{StrategyType, SyncConfig};
use super::fatal;
use super::traits::RawSpinLock;
use crate::core::errors::SyncResult;
use std::fmt;
use tracing::debug;

/// Spinlock whose implementation body fills exactly one cache line
///
/// Prefer [`SpinLock::guard`] over the raw `lock`/`unlock` pair.
/// Not re-entrant: locking twice from the same thread deadlocks.
///
/// # Examples
///
/// ```
/// use worker_sync::SpinLock;
///
/// let lock = SpinLock::new();
/// {
///     let _guard = lock.guard();
///     assert!(lock.is_locked());
/// }
/// assert!(!lock.is_locked());
/// ```
pub struct SpinLock {
    inner: Box<dyn RawSpinLock>,
}

impl SpinLock {
    /// Create an unlocked spinlock with the default backend
    pub fn new() -> Self {
        Self::with_config(&SyncConfig::default())
    }

    /// Create with an explicit backend configuration
    ///
    /// # Panics
    ///
    /// Fatal if the configuration fails validation.
    #[track_caller]
    pub fn with_config(config: &SyncConfig) -> Self {
        Self::try_with_config(config).unwrap_or_else(|e| fatal(e))
    }

    /// Checked construction
    pub fn try_with_config(config: &SyncConfig) -> SyncResult<Self> {
        config.validate()?;

        // Futex and condvar have no spinning analogue; both map to plain TAS
        let inner: Box<dyn RawSpinLock> = match config.select_strategy() {
            StrategyType::SpinWait => Box::new(BackoffSpinLock::new(config.backoff_cap)),
            StrategyType::Futex | StrategyType::Condvar | StrategyType::Auto => {
                Box::new(TasSpinLock::new())
            }
        };

        debug!(backend = inner.name(), "SpinLock created");
        Ok(Self { inner })
    }

    /// Busy-wait until the lock is acquired
    #[inline]
    pub fn lock(&self) {
        self.inner.lock();
    }

    /// Acquire without spinning
    ///
    /// Returns `true` if the lock is now held by the caller.
    #[inline]
    pub fn try_lock(&self) -> bool {
        self.inner.try_lock()
    }

    /// Release the lock
    ///
    /// # Safety
    ///
    /// The calling critical section must hold the lock, acquired through
    /// [`SpinLock::lock`] or a successful [`SpinLock::try_lock`]. Releasing a
    /// lock held by someone else breaks mutual exclusion.
    #[inline]
    pub unsafe fn unlock(&self) {
        self.inner.unlock();
    }

    /// Acquire and return a guard that releases on drop
    #[inline]
    pub fn guard(&self) -> SpinLockGuard<'_> {
        self.inner.lock();
        SpinLockGuard { lock: self }
    }

    /// Acquire without spinning, returning a guard on success
    #[inline]
    pub fn try_guard(&self) -> Option<SpinLockGuard<'_>> {
        self.inner.try_lock().then(|| SpinLockGuard { lock: self })
    }

    /// Snapshot of the lock state (for diagnostics)
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// Get the name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpinLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLock")
            .field("backend", &self.inner.name())
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}

/// RAII guard for a held [`SpinLock`]
#[must_use = "if unused the SpinLock will immediately unlock"]
pub struct SpinLockGuard<'a> {
    lock: &'a SpinLock,
}

impl Drop for SpinLockGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: a guard only exists while its lock is held
        unsafe { self.lock.inner.unlock() };
    }
}

impl fmt::Debug for SpinLockGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLockGuard")
            .field("backend", &self.lock.inner.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        assert_eq!(SpinLock::new().backend_name(), "tas");
        assert_eq!(
            SpinLock::with_config(&SyncConfig::low_latency()).backend_name(),
            "backoff"
        );
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let lock = SpinLock::new();
        {
            let _guard = lock.guard();
            assert!(lock.is_locked());
            assert!(lock.try_guard().is_none());
        }
        assert!(!lock.is_locked());
        assert!(lock.try_guard().is_some());
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_raw_lock_unlock() {
        let lock = SpinLock::new();
        lock.lock();
        assert!(!lock.try_lock());
        unsafe { lock.unlock() };
        assert!(lock.try_lock());
        unsafe { lock.unlock() };
    }
}
