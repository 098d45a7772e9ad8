/*!
 * Error Types
 * Construction-time errors with thiserror, miette and serde support
 *
 * Only construction and configuration can fail recoverably. Hot-path misuse
 * (unlocking an unheld lock, dropping a primitive with waiters) is a caller
 * obligation and is never reported through these types.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for checked construction and configuration
pub type SyncResult<T> = Result<T, SyncError>;

/// Synchronization primitive errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SyncError {
    #[error("Barrier requires at least one participant")]
    #[diagnostic(
        code(sync::zero_participants),
        help("A barrier with zero participants can never trip. Pass the size of the thread cohort.")
    )]
    ZeroParticipants,

    #[error("Semaphore count {requested} exceeds maximum {max}")]
    #[diagnostic(
        code(sync::count_overflow),
        help("Initial semaphore counts are limited to the platform's SEM_VALUE_MAX.")
    )]
    CountOverflow { requested: u32, max: u32 },

    #[error("Unknown synchronization strategy: {0}")]
    #[diagnostic(
        code(sync::invalid_strategy),
        help("Use one of: auto, futex, condvar, spinwait.")
    )]
    InvalidStrategy(String),

    #[error("Invalid synchronization configuration: {0}")]
    #[diagnostic(
        code(sync::invalid_config),
        help("Spin and backoff limits must be positive integers.")
    )]
    InvalidConfig(String),
}
