//! Callable host values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{ScriptError, Value};

/// A function that can be called with arguments and returns a `Result`.
///
/// This represents a host callback usable as a promise handler or as the
/// `then` member of a thenable. An `Ok` return is the function's value; an
/// `Err` return models a raised failure.
///
/// Cloning is cheap and shares the underlying closure, so the same function
/// value can be handed to several collaborators (a queue, a thenable, a
/// handler slot) and still observe its own captured state.
///
/// # Examples
///
/// ```
/// use core_types::{NativeFunction, Value};
///
/// let double = NativeFunction::new(|args| match args.first() {
///     Some(Value::Smi(n)) => Ok(Value::Smi(n * 2)),
///     _ => Ok(Value::Undefined),
/// });
/// assert_eq!(double.call(vec![Value::Smi(21)]), Ok(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct NativeFunction {
    callback: Rc<RefCell<dyn FnMut(Vec<Value>) -> Result<Value, ScriptError>>>,
}

impl NativeFunction {
    /// Creates a new function from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(Vec<Value>) -> Result<Value, ScriptError> + 'static,
    {
        Self {
            callback: Rc::new(RefCell::new(f)),
        }
    }

    /// Calls the function with the given arguments.
    ///
    /// A call that re-enters the same function while it is still running
    /// raises an `InternalError` instead of aborting the runtime.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, ScriptError> {
        let mut callback = self
            .callback
            .try_borrow_mut()
            .map_err(|_| ScriptError::internal("reentrant call of a native function"))?;
        (callback)(args)
    }

    /// Returns whether two function values share the same underlying closure.
    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.callback) as *const u8,
            Rc::as_ptr(&other.callback) as *const u8,
        )
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction {{ ... }}")
    }
}
