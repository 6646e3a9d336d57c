// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Timestamp is NaN, infinite, or could not be parsed.
    InvalidTimestamp,
    /// Latitude or longitude is non-finite or outside its range.
    InvalidCoordinate,
    /// Internal structure check failed. Carries the name of the broken rule.
    InvariantViolation(&'static str),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::InvalidTimestamp => f.write_str("invalid timestamp"),
            KernelError::InvalidCoordinate => f.write_str("invalid coordinate"),
            KernelError::InvariantViolation(rule) => write!(f, "invariant violated: {}", rule),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KernelError {}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
pub type Result<T> = KernelResult<T>;
