//! Dynamic value representation.
//!
//! This module provides the `Value` enum that represents every payload the
//! runtime passes around: settled promise outcomes, rejection reasons,
//! callback arguments and return values. Payloads are opaque to the
//! scheduling protocol itself; the variants exist so hosts can move real
//! data through it.

use num_bigint::BigInt;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{NativeFunction, ScriptError};

/// Duck-typed property access for object-like values.
///
/// This is the capability the adoption protocol probes: a foreign value is
/// treated as a thenable exactly when reading its `then` property yields a
/// callable. Property reads go through `get` so that throwing accessors are
/// representable; an absent property reads as [`Value::Undefined`], not an
/// error.
///
/// `as_any` exposes the object for reflective downcasting, which is how
/// first-class runtime objects (promises among them) are recognized inside a
/// `Value` without a dynamic probe.
pub trait ObjectLike {
    /// Reads a property. Implementations may raise.
    fn get(self: Rc<Self>, key: &str) -> Result<Value, ScriptError>;

    /// Returns the object as `Any` for downcasting.
    fn as_any(self: Rc<Self>) -> Rc<dyn Any>;
}

/// Represents any runtime value.
///
/// Scalars are stored inline; objects and functions are reference-counted
/// and compare by identity.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let number = Value::Smi(42);
/// assert_eq!(number.type_of(), "number");
/// assert_eq!(Value::Null.type_of(), "object");
/// ```
#[derive(Clone)]
pub enum Value {
    /// Absent value
    Undefined,
    /// Explicit null value
    Null,
    /// Boolean (true or false)
    Boolean(bool),
    /// Small integer (fits in 32 bits)
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// String value
    String(String),
    /// Arbitrary precision integer
    BigInt(BigInt),
    /// Ordered sequence of values
    List(Vec<Value>),
    /// Callable host value
    Function(NativeFunction),
    /// Object-like value with duck-typed property access
    Object(Rc<dyn ObjectLike>),
    /// A raised failure carried as a value
    Error(ScriptError),
}

impl Value {
    /// Returns a type name for diagnostics, following script conventions
    /// (`null` reports `"object"`).
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::List(_) | Value::Object(_) | Value::Error(_) => "object",
            Value::Boolean(_) => "boolean",
            Value::Smi(_) | Value::Double(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }
}

fn same_object(a: &Rc<dyn ObjectLike>, b: &Rc<dyn ObjectLike>) -> bool {
    // Compare data pointers only; the vtable half of the fat pointer is not
    // stable across codegen units.
    std::ptr::eq(Rc::as_ptr(a) as *const u8, Rc::as_ptr(b) as *const u8)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Function(func) => fmt::Debug::fmt(func, f),
            Value::Object(_) => write!(f, "Object(...)"),
            Value::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}

/// A concrete string-keyed object.
///
/// This is the workhorse for foreign object-like values: thenables built by
/// hosts and the status records produced by settlement aggregation. Absent
/// properties read as [`Value::Undefined`].
///
/// # Examples
///
/// ```
/// use core_types::{ObjectLike, PlainObject, Value};
///
/// let object = PlainObject::new();
/// object.set("status", Value::String("fulfilled".to_string()));
/// assert_eq!(
///     object.clone().get("status"),
///     Ok(Value::String("fulfilled".to_string()))
/// );
/// assert_eq!(object.get("missing"), Ok(Value::Undefined));
/// ```
#[derive(Default)]
pub struct PlainObject {
    properties: RefCell<HashMap<String, Value>>,
}

impl PlainObject {
    /// Creates a new empty object behind an `Rc`.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Sets a property, replacing any previous value under the same key.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.properties.borrow_mut().insert(key.into(), value);
    }
}

impl ObjectLike for PlainObject {
    fn get(self: Rc<Self>, key: &str) -> Result<Value, ScriptError> {
        Ok(self
            .properties
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or(Value::Undefined))
    }

    fn as_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
