/*!
 * Thread Barrier
 *
 * Cyclic rendezvous for a fixed cohort. Each trip moves through:
 * - **Accumulating**: arrivals below `participants` block
 * - **Release**: the completing arrival resets the count, releases the
 *   trip's waiters and returns `true`
 * and starts over with no reconfiguration.
 */

mod condvar;
mod futex;

use self::condvar::CondvarBarrier;
use self::futex::FutexBarrier;
use super::config::{StrategyType, SyncConfig};
use super::fatal;
use super::traits::RawBarrier;
use crate::core::errors::{SyncError, SyncResult};
use std::fmt;
use tracing::debug;

/// Reusable N-party barrier
///
/// Every released thread observes all memory writes made by every
/// participant before its own `wait` call.
///
/// # Examples
///
/// ```
/// use worker_sync::ThreadBarrier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let barrier = Arc::new(ThreadBarrier::new(3));
/// let handles: Vec<_> = (0..3)
///     .map(|_| {
///         let barrier = barrier.clone();
///         thread::spawn(move || barrier.wait())
///     })
///     .collect();
///
/// let leaders = handles
///     .into_iter()
///     .map(|h| h.join().unwrap())
///     .filter(|&leader| leader)
///     .count();
/// assert_eq!(leaders, 1);
/// ```
pub struct ThreadBarrier {
    inner: Box<dyn RawBarrier>,
}

impl ThreadBarrier {
    /// Create a barrier for `participants` threads with the default backend
    ///
    /// # Panics
    ///
    /// Fatal if `participants` is 0.
    #[track_caller]
    pub fn new(participants: usize) -> Self {
        Self::try_new(participants).unwrap_or_else(|e| fatal(e))
    }

    /// Create with an explicit backend configuration
    ///
    /// # Panics
    ///
    /// Fatal if `participants` is 0 or the configuration is invalid.
    #[track_caller]
    pub fn with_config(participants: usize, config: &SyncConfig) -> Self {
        Self::try_with_config(participants, config).unwrap_or_else(|e| fatal(e))
    }

    /// Checked construction with the default backend
    pub fn try_new(participants: usize) -> SyncResult<Self> {
        Self::try_with_config(participants, &SyncConfig::default())
    }

    /// Checked construction with an explicit backend configuration
    pub fn try_with_config(participants: usize, config: &SyncConfig) -> SyncResult<Self> {
        if participants == 0 {
            return Err(SyncError::ZeroParticipants);
        }
        config.validate()?;

        // Parking beats spinning for a whole cohort; SpinWait parks too
        let inner: Box<dyn RawBarrier> = match config.select_strategy() {
            StrategyType::Condvar => Box::new(CondvarBarrier::new(participants)),
            StrategyType::Futex | StrategyType::SpinWait | StrategyType::Auto => {
                Box::new(FutexBarrier::new(participants))
            }
        };

        debug!(backend = inner.name(), participants, "ThreadBarrier created");
        Ok(Self { inner })
    }

    /// Arrive and block until all participants of this trip have arrived
    ///
    /// Returns `true` for exactly one thread per trip, the one whose arrival
    /// completed it, and `false` for every other participant.
    #[inline]
    pub fn wait(&self) -> bool {
        self.inner.wait()
    }

    /// Number of arrivals that complete a trip
    pub fn participants(&self) -> usize {
        self.inner.participants()
    }

    /// Get the name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl fmt::Debug for ThreadBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadBarrier")
            .field("backend", &self.inner.name())
            .field("participants", &self.inner.participants())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_participants_rejected() {
        assert!(matches!(
            ThreadBarrier::try_new(0),
            Err(SyncError::ZeroParticipants)
        ));
    }

    #[test]
    #[should_panic(expected = "at least one participant")]
    fn test_zero_participants_is_fatal() {
        let _ = ThreadBarrier::new(0);
    }

    #[test]
    fn test_backend_selection() {
        let condvar = ThreadBarrier::with_config(2, &SyncConfig::with_strategy(StrategyType::Condvar));
        assert_eq!(condvar.backend_name(), "condvar");
        assert_eq!(condvar.participants(), 2);

        let spin = ThreadBarrier::with_config(2, &SyncConfig::low_latency());
        assert_eq!(spin.backend_name(), "futex");
    }
}
