//! Allocation-failure error types.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;

/// The error returned by the `try_` reservation entry points when the backing
/// buffer cannot be grown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TryReserveError {
    /// The computed capacity does not fit the address space for this element
    /// type (more than `isize::MAX` bytes, or the element count itself
    /// overflowed).
    CapacityOverflow,
    /// The allocator refused the request. No allocation was made.
    AllocError {
        /// The layout of the allocation that was refused.
        layout: Layout,
    },
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => {
                write!(
                    f,
                    "requested capacity exceeds the maximum supported by the element layout"
                )
            }
            Self::AllocError { layout } => {
                write!(f, "memory allocation of {} bytes failed", layout.size())
            }
        }
    }
}

impl Error for TryReserveError {}
