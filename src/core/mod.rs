/*!
 * Core Module
 * Error types, limits, compiler hints and the synchronization primitives
 */

pub mod errors;
pub mod hints;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use hints::*;
