/*!
 * Compiler Optimization Hints
 * Branch prediction hints for the primitives' fast paths
 */

/// Hint to the compiler that this branch is likely to be taken
///
/// On nightly with `core_intrinsics`, uses LLVM's `llvm.expect` intrinsic.
/// On stable, returns the value unchanged.
#[inline(always)]
#[must_use]
pub fn likely(b: bool) -> bool {
    #[cfg(feature = "nightly")]
    {
        ::core::intrinsics::likely(b)
    }
    #[cfg(not(feature = "nightly"))]
    {
        b
    }
}

/// Hint to the compiler that this branch is unlikely to be taken
///
/// Use for slow paths: parking, timeouts, trip completion.
#[inline(always)]
#[must_use]
pub fn unlikely(b: bool) -> bool {
    #[cfg(feature = "nightly")]
    {
        ::core::intrinsics::unlikely(b)
    }
    #[cfg(not(feature = "nightly"))]
    {
        b
    }
}
