//! Promise combinators.
//!
//! Each combinator folds an ordered collection of inputs into one output
//! promise using a shared counting pattern. Inputs are coerced with
//! [`Promise::resolve`] first, so plain values participate as
//! already-fulfilled inputs. Late reports after the output has settled are
//! discarded by the single-settlement invariant.

use core_types::{PlainObject, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::promise::{Promise, Thenable};
use crate::task_queue::MicrotaskQueue;

impl Promise {
    /// Fulfills with every input's fulfillment value, in input order, once
    /// all inputs fulfill; rejects with the first rejection reason as soon
    /// as any input rejects.
    ///
    /// An empty input fulfills immediately with an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use promise_runtime::{EventLoop, Promise};
    ///
    /// let event_loop = EventLoop::new();
    /// let queue = event_loop.microtask_queue();
    ///
    /// let combined = Promise::all(&queue, vec![Value::Smi(1), Value::Smi(2)]);
    /// event_loop.run_until_done();
    /// assert_eq!(
    ///     combined.result(),
    ///     Some(Value::List(vec![Value::Smi(1), Value::Smi(2)]))
    /// );
    /// ```
    pub fn all(queue: &MicrotaskQueue, inputs: Vec<Value>) -> Promise {
        let output = Promise::new(queue);
        let total = inputs.len();
        if total == 0 {
            output.fulfill_with(Value::List(Vec::new()));
            return output;
        }

        let slots = Rc::new(RefCell::new(vec![Value::Undefined; total]));
        let remaining = Rc::new(Cell::new(total));
        for (index, input) in inputs.into_iter().enumerate() {
            let source = Promise::resolve(queue, input);
            let slots = Rc::clone(&slots);
            let remaining = Rc::clone(&remaining);
            let fulfilled = output.clone();
            let rejected = output.clone();
            source.subscribe(
                Box::new(move |value| {
                    slots.borrow_mut()[index] = value;
                    if last_report(&remaining) {
                        fulfilled.fulfill_with(Value::List(slots.take()));
                    }
                }),
                Box::new(move |reason| rejected.reject_with(reason)),
            );
        }
        output
    }

    /// Fulfills once every input settles, with one status record per input
    /// position, in input order. Never rejects.
    ///
    /// Each record is an object with a `status` property of `"fulfilled"`
    /// or `"rejected"` plus the matching `value` or `reason` property.
    /// An empty input fulfills immediately with an empty list.
    pub fn all_settled(queue: &MicrotaskQueue, inputs: Vec<Value>) -> Promise {
        let output = Promise::new(queue);
        let total = inputs.len();
        if total == 0 {
            output.fulfill_with(Value::List(Vec::new()));
            return output;
        }

        let slots = Rc::new(RefCell::new(vec![Value::Undefined; total]));
        let remaining = Rc::new(Cell::new(total));
        for (index, input) in inputs.into_iter().enumerate() {
            let source = Promise::resolve(queue, input);
            let fulfilled_slots = Rc::clone(&slots);
            let rejected_slots = Rc::clone(&slots);
            let fulfilled_remaining = Rc::clone(&remaining);
            let rejected_remaining = Rc::clone(&remaining);
            let fulfilled = output.clone();
            let rejected = output.clone();
            source.subscribe(
                Box::new(move |value| {
                    fulfilled_slots.borrow_mut()[index] = settled_record("fulfilled", "value", value);
                    if last_report(&fulfilled_remaining) {
                        fulfilled.fulfill_with(Value::List(fulfilled_slots.take()));
                    }
                }),
                Box::new(move |reason| {
                    rejected_slots.borrow_mut()[index] = settled_record("rejected", "reason", reason);
                    if last_report(&rejected_remaining) {
                        rejected.fulfill_with(Value::List(rejected_slots.take()));
                    }
                }),
            );
        }
        output
    }

    /// Settles with the outcome of whichever input settles first, fulfilled
    /// or rejected; every later outcome is discarded.
    ///
    /// An empty input yields a promise that stays pending forever.
    pub fn race(queue: &MicrotaskQueue, inputs: Vec<Value>) -> Promise {
        let output = Promise::new(queue);
        for input in inputs {
            let source = Promise::resolve(queue, input);
            let winner = output.clone();
            let loser = output.clone();
            source.subscribe(
                Box::new(move |value| winner.fulfill_with(value)),
                Box::new(move |reason| loser.reject_with(reason)),
            );
        }
        output
    }
}

fn settled_record(status: &str, key: &str, payload: Value) -> Value {
    let record = PlainObject::new();
    record.set("status", Value::String(status.to_string()));
    record.set(key, payload);
    Value::Object(record)
}

fn last_report(remaining: &Cell<usize>) -> bool {
    let left = remaining.get() - 1;
    remaining.set(left);
    left == 0
}
