/*!
 * Counting Semaphore
 *
 * Blocking and deadline-bounded wait/post counter with a backend chosen at
 * construction time.
 */

mod condvar;
mod futex;
mod spinwait;

use self::condvar::CondvarSemaphore;
use self::futex::FutexSemaphore;
use self::spinwait::SpinWaitSemaphore;
use super::config::{StrategyType, SyncConfig};
use super::deadline::Deadline;
use super::fatal;
use super::traits::RawSemaphore;
use crate::core::errors::{SyncError, SyncResult};
use crate::core::limits::MAX_SEMAPHORE_COUNT;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Counting semaphore
///
/// `post` increments the count and wakes at most one waiter; `wait`
/// blocks until the count is positive and decrements it.
///
/// The type is neither `Clone` nor `Copy`: share it by reference or `Arc`.
///
/// # Examples
///
/// ```
/// use worker_sync::{Deadline, Semaphore};
/// use std::time::Duration;
///
/// let sem = Semaphore::new(1);
/// sem.wait();
///
/// // Count is zero now, so a short deadline expires
/// assert!(!sem.timed_wait(Deadline::after(Duration::from_millis(10))));
///
/// sem.post();
/// assert!(sem.try_wait());
/// ```
pub struct Semaphore {
    inner: Box<dyn RawSemaphore>,
}

impl Semaphore {
    /// Create a semaphore with the platform's default backend
    ///
    /// # Panics
    ///
    /// Fatal if `initial` exceeds `MAX_SEMAPHORE_COUNT`.
    #[track_caller]
    pub fn new(initial: u32) -> Self {
        Self::try_new(initial).unwrap_or_else(|e| fatal(e))
    }

    /// Create with an explicit backend configuration
    ///
    /// # Panics
    ///
    /// Fatal if `initial` exceeds `MAX_SEMAPHORE_COUNT`.
    #[track_caller]
    pub fn with_config(initial: u32, config: &SyncConfig) -> Self {
        Self::try_with_config(initial, config).unwrap_or_else(|e| fatal(e))
    }

    /// Checked construction with the platform's default backend
    pub fn try_new(initial: u32) -> SyncResult<Self> {
        Self::try_with_config(initial, &SyncConfig::default())
    }

    /// Checked construction with an explicit backend configuration
    pub fn try_with_config(initial: u32, config: &SyncConfig) -> SyncResult<Self> {
        if initial > MAX_SEMAPHORE_COUNT {
            return Err(SyncError::CountOverflow {
                requested: initial,
                max: MAX_SEMAPHORE_COUNT,
            });
        }
        config.validate()?;

        let inner: Box<dyn RawSemaphore> = match config.select_strategy() {
            StrategyType::Condvar => Box::new(CondvarSemaphore::new(initial)),
            StrategyType::SpinWait => {
                Box::new(SpinWaitSemaphore::new(initial, config.spin_limit))
            }
            // Auto is resolved by select_strategy
            StrategyType::Futex | StrategyType::Auto => Box::new(FutexSemaphore::new(initial)),
        };

        debug!(backend = inner.name(), initial, "Semaphore created");
        Ok(Self { inner })
    }

    /// Block until the count is positive, then decrement it
    ///
    /// Blocks indefinitely if never posted.
    #[inline]
    pub fn wait(&self) {
        self.inner.wait();
    }

    /// Wait until the absolute `deadline`
    ///
    /// Returns `true` if the count was decremented, `false` on timeout.
    /// A deadline already in the past never blocks.
    #[inline]
    pub fn timed_wait(&self, deadline: Deadline) -> bool {
        self.inner.wait_until(deadline)
    }

    /// Relative-timeout convenience over `timed_wait`
    #[inline]
    pub fn wait_for(&self, timeout: Duration) -> bool {
        self.inner.wait_until(Deadline::after(timeout))
    }

    /// Decrement without blocking
    #[inline]
    pub fn try_wait(&self) -> bool {
        self.inner.try_wait()
    }

    /// Increment the count and wake at most one waiter
    ///
    /// Never blocks.
    #[inline]
    pub fn post(&self) {
        self.inner.post();
    }

    /// Approximate current count (for diagnostics)
    pub fn available(&self) -> u32 {
        self.inner.available()
    }

    /// Get the name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semaphore")
            .field("backend", &self.inner.name())
            .field("available", &self.inner.available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        let cases = [
            (StrategyType::Futex, "futex"),
            (StrategyType::Condvar, "condvar"),
            (StrategyType::SpinWait, "spinwait"),
        ];
        for (strategy, name) in cases {
            let sem = Semaphore::with_config(0, &SyncConfig::with_strategy(strategy));
            assert_eq!(sem.backend_name(), name);
        }
    }

    #[test]
    fn test_try_new_rejects_overflow() {
        let result = Semaphore::try_new(MAX_SEMAPHORE_COUNT + 1);
        assert!(matches!(result, Err(SyncError::CountOverflow { .. })));
        assert!(Semaphore::try_new(MAX_SEMAPHORE_COUNT).is_ok());
    }

    #[test]
    #[should_panic(expected = "exceeds maximum")]
    fn test_new_overflow_is_fatal() {
        let _ = Semaphore::new(u32::MAX);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SyncConfig {
            spin_limit: 0,
            ..SyncConfig::low_latency()
        };
        assert!(matches!(
            Semaphore::try_with_config(0, &config),
            Err(SyncError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_debug_output() {
        let sem = Semaphore::with_config(3, &SyncConfig::with_strategy(StrategyType::Condvar));
        let rendered = format!("{sem:?}");
        assert!(rendered.contains("condvar"));
        assert!(rendered.contains('3'));
    }
}
