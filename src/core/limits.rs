/*!
 * Synchronization Limits and Constants
 *
 * Centralized location for sizes, thresholds and tuning defaults used by the
 * primitives and their backends.
 *
 * - Performance-critical constants are marked with [PERF]
 * - Linux-compatible values are marked with [LINUX-COMPAT]
 */

// =============================================================================
// MEMORY LAYOUT
// =============================================================================

/// Cache line size assumed for padding (64 bytes)
/// [PERF] x86-64, ARM64 and RISC-V all use 64-byte lines
pub const CACHE_LINE_SIZE: usize = 64;

// =============================================================================
// SEMAPHORE
// =============================================================================

/// Largest initial semaphore count accepted by checked construction
/// [LINUX-COMPAT] Matches SEM_VALUE_MAX
pub const MAX_SEMAPHORE_COUNT: u32 = i32::MAX as u32;

/// Spin iterations before the spinwait semaphore parks (100 iterations)
/// [PERF] Covers a post arriving within roughly a microsecond
pub const DEFAULT_SPIN_LIMIT: u32 = 100;

/// Spin iterations for the low-latency preset (500 iterations)
pub const LOW_LATENCY_SPIN_LIMIT: u32 = 500;

/// Spin iterations for the long-wait preset (10 iterations)
pub const LONG_WAIT_SPIN_LIMIT: u32 = 10;

/// Iterations of the tight `spin_loop` phase before yielding (10 iterations)
/// [PERF] Below ~100ns a yield costs more than it saves
pub const TIGHT_SPIN_ITERATIONS: u32 = 10;

// =============================================================================
// SPINLOCK
// =============================================================================

/// Maximum `spin_loop` hints per backoff step (64 hints)
/// [PERF] Must be power of 2, doubled each contended retry
pub const DEFAULT_BACKOFF_CAP: u32 = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two_requirements() {
        assert!(CACHE_LINE_SIZE.is_power_of_two());
        assert!(DEFAULT_BACKOFF_CAP.is_power_of_two());
    }

    #[test]
    fn test_spin_presets_ordered() {
        assert!(LONG_WAIT_SPIN_LIMIT < DEFAULT_SPIN_LIMIT);
        assert!(DEFAULT_SPIN_LIMIT < LOW_LATENCY_SPIN_LIMIT);
        assert!(TIGHT_SPIN_ITERATIONS < DEFAULT_SPIN_LIMIT);
    }
}
