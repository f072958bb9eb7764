//! The resolution procedure.
//!
//! Given an arbitrary value produced by a handler, this decides whether the
//! downstream promise adopts it as another deferred outcome (a first-class
//! promise or a foreign thenable) or settles with it as a plain value.

use core_types::{NativeFunction, ObjectLike, ScriptError, Value};
use std::cell::Cell;
use std::rc::Rc;

use crate::promise::{Promise, Thenable};

/// Settles `downstream` from `x`.
///
/// First-class promises are adopted through the [`Thenable`] subscription
/// capability; object-like foreign values are probed for a callable `then`
/// member and, if one is found, driven through it under a one-shot latch;
/// everything else fulfills `downstream` directly.
pub(crate) fn resolve_value(downstream: &Promise, x: Value) {
    if let Some(source) = Promise::from_value(&x) {
        if source.ptr_eq(downstream) {
            downstream.reject_with(Value::Error(ScriptError::type_error(
                "promise cannot be resolved with itself",
            )));
            return;
        }
        // A promise settles exactly once, so its outcome can be adopted
        // without the latch the foreign probe needs.
        let adopt = downstream.clone();
        let forward = downstream.clone();
        source.subscribe(
            Box::new(move |value| resolve_value(&adopt, value)),
            Box::new(move |reason| forward.reject_with(reason)),
        );
        return;
    }

    let object = match x {
        Value::Object(object) => object,
        plain => {
            downstream.fulfill_with(plain);
            return;
        }
    };

    let member = match object.clone().get("then") {
        Ok(member) => member,
        Err(error) => {
            downstream.reject_with(Value::Error(error));
            return;
        }
    };
    let Value::Function(then) = member else {
        // It only looked thenable; settle with the object itself.
        downstream.fulfill_with(Value::Object(object));
        return;
    };

    // A misbehaving thenable may invoke both callbacks, invoke one twice,
    // or do so synchronously and asynchronously both. Only the first call
    // to either callback has effect.
    let latch = Rc::new(Cell::new(false));

    let adopt = downstream.clone();
    let fulfill_latch = Rc::clone(&latch);
    let report_fulfilled = NativeFunction::new(move |args| {
        if fulfill_latch.replace(true) {
            return Ok(Value::Undefined);
        }
        resolve_value(&adopt, reported(args));
        Ok(Value::Undefined)
    });

    let forward = downstream.clone();
    let reject_latch = Rc::clone(&latch);
    let report_rejected = NativeFunction::new(move |args| {
        if reject_latch.replace(true) {
            return Ok(Value::Undefined);
        }
        forward.reject_with(reported(args));
        Ok(Value::Undefined)
    });

    if let Err(error) = then.call(vec![
        Value::Function(report_fulfilled),
        Value::Function(report_rejected),
    ]) {
        // A raise after the latch fired is swallowed; the outcome was
        // already decided.
        if !latch.get() {
            downstream.reject_with(Value::Error(error));
        }
    }
}

fn reported(args: Vec<Value>) -> Value {
    args.into_iter().next().unwrap_or(Value::Undefined)
}
