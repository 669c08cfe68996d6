//! Error types for set construction and mutation.
//!
//! Two things can fail in this crate: constructing a set with invalid
//! capacity parameters, and mutating a set that was built from a
//! read-only source. Both are reported through [`Error`]; nothing is
//! silently swallowed.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by set construction and mutation.
///
/// # Examples
///
/// ```rust
/// use foldset::{CaselessSet, Error};
///
/// let set = CaselessSet::<String>::with_capacity_and_load_factor(16, 0.0);
/// assert!(matches!(set, Err(Error::InvalidArgument { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A constructor parameter violated the backing table's constraints,
    /// e.g. a non-finite or non-positive load factor.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the parameter.
        reason: String,
    },

    /// A mutator was called on a set constructed from a read-only source.
    /// Such a set is permanently immutable.
    #[error("set is read-only: {operation} is not supported")]
    Unsupported {
        /// The mutating operation that was rejected.
        operation: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }
}

// =============================================================================
// Tests
// =============================================================================
