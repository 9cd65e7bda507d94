//! Error types for the multi-index.

use thiserror::Error;

use crate::popcnt::PopcountBackend;

/// Errors raised by index construction and operations.
///
/// Only `DuplicateKey` is recoverable per operation; the remaining
/// variants are construction-time and mean no index was built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Item byte length is not divisible by eight (required for the
    /// 64-bit popcount kernel).
    #[error("item length of {0} bytes is not divisible by 8")]
    BadAlignment(usize),

    /// The requested popcount backend is not available on this CPU.
    #[error("popcount backend {0:?} is not supported on this CPU")]
    PopcountUnsupported(PopcountBackend),

    /// A construction parameter is zero or out of range.
    #[error("invalid parameter: {0}")]
    BadParameter(&'static str),

    /// The key is already present in the index.
    #[error("key {0} is already present in the index")]
    DuplicateKey(u32),

    /// The query radius is outside [0, 1].
    #[error("range {0} is outside the [0, 1] interval")]
    BadRange(f32),
}

pub type Result<T> = std::result::Result<T, IndexError>;
