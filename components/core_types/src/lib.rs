//! Core value types and error handling for the Eventide runtime.
//!
//! This crate provides the foundational types the deferred-value protocol
//! operates on: the dynamic value representation, callable host values,
//! duck-typed object access, and script errors.
//!
//! # Overview
//!
//! - [`Value`] - Dynamic representation of runtime payloads
//! - [`NativeFunction`] - Callable host value used for handlers and thenables
//! - [`ObjectLike`] / [`PlainObject`] - Duck-typed object capability
//! - [`ScriptError`] / [`ErrorKind`] - Raised script failures
//!
//! # Examples
//!
//! ```
//! use core_types::{NativeFunction, ScriptError, Value};
//!
//! // Create runtime values
//! let num = Value::Smi(42);
//! assert_eq!(num.type_of(), "number");
//!
//! // A callable host value that raises
//! let throws = NativeFunction::new(|_args| {
//!     Err(ScriptError::type_error("undefined is not a function"))
//! });
//! assert!(throws.call(vec![]).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod function;
mod value;

pub use error::{ErrorKind, ScriptError};
pub use function::NativeFunction;
pub use value::{ObjectLike, PlainObject, Value};
