//! Error types for array operations.
//!
//! The taxonomy is deliberately small: allocation failure is the only
//! resource error the container can hit, and an out-of-range index on the
//! delete paths is the only caller-usage error. Both are reported as plain
//! `Err` values; no operation panics, retries, or partially applies.

use std::error::Error;
use std::fmt;

/// Errors from [`GrowVec`](crate::GrowVec) operations.
///
/// Every failing operation leaves the handle exactly as it was before the
/// call. Whether to retry (e.g. after freeing memory elsewhere) or abort is
/// the caller's decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VecError {
    /// The backing storage could not be grown to the required size.
    ///
    /// Also reported when the required byte size cannot be represented at
    /// all (capacity arithmetic overflow); such a request can never be
    /// satisfied by any allocator.
    AllocFailed {
        /// Number of bytes the failed (re)allocation asked for.
        requested: usize,
    },
    /// A delete was attempted at an index at or beyond the current length.
    ///
    /// Insert and push never produce this: inserting beyond the current
    /// length extends the array instead.
    OutOfBounds {
        /// The offending index.
        index: u32,
        /// The length at the time of the call.
        len: u32,
    },
}

impl fmt::Display for VecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocFailed { requested } => {
                write!(f, "allocation of {requested} bytes failed")
            }
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
        }
    }
}

impl Error for VecError {}
