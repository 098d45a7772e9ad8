/*!
 * Worker Synchronization Primitives
 * Portable semaphore, spinlock and barrier for coordinating worker threads
 */

#![cfg_attr(feature = "nightly", feature(core_intrinsics))]
#![cfg_attr(feature = "nightly", allow(internal_features))]

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{SyncError, SyncResult};
pub use crate::core::sync::{
    Deadline, Semaphore, SpinLock, SpinLockGuard, StrategyType, SyncConfig, ThreadBarrier,
};
pub use monitoring::init_tracing;
