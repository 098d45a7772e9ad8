/*!
 * Synchronization Configuration
 *
 * Backend selection for every primitive. `Auto` resolves at build time via
 * `cfg(target_os)`; explicit strategies exist for benchmarks and tests.
 */

use crate::core::errors::{SyncError, SyncResult};
use crate::core::limits::{
    DEFAULT_BACKOFF_CAP, DEFAULT_SPIN_LIMIT, LONG_WAIT_SPIN_LIMIT, LOW_LATENCY_SPIN_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    /// Futex-style parking (fastest on Linux)
    Futex,
    /// Mutex + condition variable (cross-platform, reliable)
    Condvar,
    /// Spin first, then park (low-latency, high-CPU for short waits)
    SpinWait,
    /// Auto-select based on target platform
    Auto,
}

impl StrategyType {
    /// Backend the current target resolves `Auto` to
    pub const fn platform_default() -> Self {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        {
            StrategyType::Futex
        }
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        {
            StrategyType::Condvar
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Futex => "futex",
            StrategyType::Condvar => "condvar",
            StrategyType::SpinWait => "spinwait",
            StrategyType::Auto => "auto",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(StrategyType::Auto),
            "futex" => Ok(StrategyType::Futex),
            "condvar" => Ok(StrategyType::Condvar),
            "spinwait" | "spin" => Ok(StrategyType::SpinWait),
            other => Err(SyncError::InvalidStrategy(other.to_string())),
        }
    }
}

/// Synchronization configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
    /// Spin iterations before parking (SpinWait semaphore)
    pub spin_limit: u32,
    /// Maximum `spin_loop` hints per backoff step (SpinWait spinlock)
    pub backoff_cap: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_limit: DEFAULT_SPIN_LIMIT,
            backoff_cap: DEFAULT_BACKOFF_CAP,
        }
    }
}

impl SyncConfig {
    /// Environment variable naming the strategy
    pub const ENV_STRATEGY: &'static str = "SYNC_STRATEGY";
    /// Environment variable overriding `spin_limit`
    pub const ENV_SPIN_LIMIT: &'static str = "SYNC_SPIN_LIMIT";
    /// Environment variable overriding `backoff_cap`
    pub const ENV_BACKOFF_CAP: &'static str = "SYNC_BACKOFF_CAP";

    /// Configuration with an explicit strategy and default tuning
    pub fn with_strategy(strategy: StrategyType) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Configuration optimized for low-latency (< 1ms wait expected)
    pub const fn low_latency() -> Self {
        Self {
            strategy: StrategyType::SpinWait,
            spin_limit: LOW_LATENCY_SPIN_LIMIT,
            backoff_cap: DEFAULT_BACKOFF_CAP,
        }
    }

    /// Configuration optimized for long waits (> 1ms expected)
    pub const fn long_wait() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_limit: LONG_WAIT_SPIN_LIMIT,
            backoff_cap: DEFAULT_BACKOFF_CAP,
        }
    }

    /// Load configuration from the environment, falling back to defaults
    ///
    /// Environment variables:
    /// - SYNC_STRATEGY: auto | futex | condvar | spinwait
    /// - SYNC_SPIN_LIMIT: spin iterations before parking
    /// - SYNC_BACKOFF_CAP: spinlock backoff ceiling
    pub fn from_env() -> SyncResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(Self::ENV_STRATEGY) {
            config.strategy = value.parse()?;
        }
        if let Ok(value) = std::env::var(Self::ENV_SPIN_LIMIT) {
            config.spin_limit = parse_limit(Self::ENV_SPIN_LIMIT, &value)?;
        }
        if let Ok(value) = std::env::var(Self::ENV_BACKOFF_CAP) {
            config.backoff_cap = parse_limit(Self::ENV_BACKOFF_CAP, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject tuning values no backend can honor
    pub fn validate(&self) -> SyncResult<()> {
        if self.spin_limit == 0 {
            return Err(SyncError::InvalidConfig("spin_limit must be > 0".into()));
        }
        if self.backoff_cap == 0 {
            return Err(SyncError::InvalidConfig("backoff_cap must be > 0".into()));
        }
        Ok(())
    }

    /// Resolve `Auto` to the backend for the current platform
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            StrategyType::Auto => StrategyType::platform_default(),
            other => other,
        }
    }
}

fn parse_limit(name: &str, value: &str) -> SyncResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| SyncError::InvalidConfig(format!("{name}={value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolves_to_concrete_backend() {
        let resolved = SyncConfig::default().select_strategy();
        assert_ne!(resolved, StrategyType::Auto);
        assert_eq!(resolved, StrategyType::platform_default());
    }

    #[test]
    fn test_explicit_strategy_is_kept() {
        let config = SyncConfig::with_strategy(StrategyType::Condvar);
        assert_eq!(config.select_strategy(), StrategyType::Condvar);
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("FUTEX".parse::<StrategyType>(), Ok(StrategyType::Futex));
        assert_eq!(" spin ".parse::<StrategyType>(), Ok(StrategyType::SpinWait));
        assert!(matches!(
            "ticket".parse::<StrategyType>(),
            Err(SyncError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = SyncConfig {
            spin_limit: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SyncError::InvalidConfig(_))));
        assert!(SyncConfig::low_latency().validate().is_ok());
    }
}
