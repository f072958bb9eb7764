//! Script error types.
//!
//! This module provides the error type raised by host callbacks and by the
//! runtime itself. Raised errors are ordinary values from the protocol's
//! point of view: a raised [`ScriptError`] becomes the rejection reason of
//! the nearest promise boundary.

use thiserror::Error;

/// The kind of script error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A value was used in a way its type does not support
    /// (e.g. a non-callable where a callback is required).
    #[error("TypeError")]
    TypeError,
    /// A value was outside its allowed range.
    #[error("RangeError")]
    RangeError,
    /// Internal runtime error.
    #[error("InternalError")]
    InternalError,
}

/// A raised script failure with a kind and a human-readable message.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, ScriptError};
///
/// let error = ScriptError::type_error("undefined is not a function");
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// assert_eq!(error.to_string(), "TypeError: undefined is not a function");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ScriptError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl ScriptError {
    /// Creates a `TypeError` with the given message.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::TypeError,
            message: message.into(),
        }
    }

    /// Creates a `RangeError` with the given message.
    pub fn range_error(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RangeError,
            message: message.into(),
        }
    }

    /// Creates an `InternalError` with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InternalError,
            message: message.into(),
        }
    }
}
