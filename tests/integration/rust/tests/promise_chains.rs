//! Promise Chain Integration Tests
//!
//! Tests the complete flow: executor or deferred source -> chained
//! handlers -> adoption of returned promises and foreign thenables ->
//! settled outcome observed through the event loop.

use core_types::{NativeFunction, ObjectLike, PlainObject, ScriptError, Value};
use promise_runtime::{Deferred, EventLoop, Promise, PromiseState};
use std::cell::RefCell;
use std::rc::Rc;

/// Helper to build a handler that appends `n` to a numeric payload.
fn add(n: i32) -> NativeFunction {
    NativeFunction::new(move |args| match args.first() {
        Some(Value::Smi(value)) => Ok(Value::Smi(value + n)),
        other => Err(ScriptError::type_error(format!(
            "expected a number, got {:?}",
            other
        ))),
    })
}

#[test]
fn test_chain_of_transformations() {
    let event_loop = EventLoop::new();
    let queue = event_loop.microtask_queue();

    let result = Promise::resolve(&queue, Value::Smi(1))
        .then(Some(add(10)), None)
        .then(Some(add(100)), None)
        .then(Some(add(1000)), None);

    event_loop.run_until_done();
    assert_eq!(result.result(), Some(Value::Smi(1111)));
}

#[test]
fn test_rejection_skips_to_the_nearest_catch() {
    let event_loop = EventLoop::new();
    let queue = event_loop.microtask_queue();
    let touched = Rc::new(RefCell::new(false));

    let flag = touched.clone();
    let recovered = Promise::reject(&queue, Value::String("root cause".to_string()))
        .then(
            Some(NativeFunction::new(move |_args| {
                *flag.borrow_mut() = true;
                Ok(Value::Undefined)
            })),
            None,
        )
        .catch(Value::Function(NativeFunction::new(|args| {
            match args.first() {
                Some(Value::String(reason)) => Ok(Value::String(format!("caught: {reason}"))),
                _ => Ok(Value::Undefined),
            }
        })))
        .expect("callable handler");

    event_loop.run_until_done();
    assert!(!*touched.borrow());
    assert_eq!(
        recovered.result(),
        Some(Value::String("caught: root cause".to_string()))
    );
}

#[test]
fn test_handler_failure_travels_to_the_end_of_the_chain() {
    let event_loop = EventLoop::new();
    let queue = event_loop.microtask_queue();

    let tail = Promise::resolve(&queue, Value::Smi(2))
        .then(
            Some(NativeFunction::new(|_args| {
                Err(ScriptError::range_error("value out of range"))
            })),
            None,
        )
        .then(Some(add(1)), None)
        .then(Some(add(1)), None);

    event_loop.run_until_done();
    assert_eq!(tail.state(), PromiseState::Rejected);
    assert_eq!(
        tail.reason(),
        Some(Value::Error(ScriptError::range_error("value out of range")))
    );
}

#[test]
fn test_returned_promise_flattens_across_components() {
    let event_loop = EventLoop::new();
    let queue = event_loop.microtask_queue();
    let deferred = Deferred::new(&queue);

    let inner = deferred.promise.clone();
    let flattened = Promise::resolve(&queue, Value::Undefined)
        .then(
            Some(NativeFunction::new(move |_args| Ok(inner.to_value()))),
            None,
        )
        .then(Some(add(1)), None);

    event_loop.run_until_done();
    assert_eq!(flattened.state(), PromiseState::Pending);

    deferred.resolve.settle(Value::Smi(41));
    event_loop.run_until_done();
    assert_eq!(flattened.result(), Some(Value::Smi(42)));
}

#[test]
fn test_foreign_thenable_joins_the_chain() {
    let event_loop = EventLoop::new();
    let queue = event_loop.microtask_queue();

    let foreign = PlainObject::new();
    foreign.set(
        "then",
        Value::Function(NativeFunction::new(|args| {
            match args.into_iter().next() {
                Some(Value::Function(report)) => report.call(vec![Value::Smi(6)]),
                _ => Ok(Value::Undefined),
            }
        })),
    );

    let foreign = Value::Object(foreign);
    let result = Promise::resolve(&queue, Value::Smi(0))
        .then(
            Some(NativeFunction::new(move |_args| Ok(foreign.clone()))),
            None,
        )
        .then(Some(add(1)), None);

    event_loop.run_until_done();
    assert_eq!(result.result(), Some(Value::Smi(7)));
}

#[test]
fn test_finally_observes_without_changing_the_outcome() {
    let event_loop = EventLoop::new();
    let queue = event_loop.microtask_queue();
    let cleanups = Rc::new(RefCell::new(0));

    let count = cleanups.clone();
    let fulfilled = Promise::resolve(&queue, Value::Smi(5))
        .finally(NativeFunction::new(move |_args| {
            *count.borrow_mut() += 1;
            Ok(Value::Undefined)
        }))
        .then(Some(add(1)), None);

    let count = cleanups.clone();
    let rejected = Promise::reject(&queue, Value::String("kept".to_string())).finally(
        NativeFunction::new(move |_args| {
            *count.borrow_mut() += 1;
            Ok(Value::Undefined)
        }),
    );

    event_loop.run_until_done();
    assert_eq!(*cleanups.borrow(), 2);
    assert_eq!(fulfilled.result(), Some(Value::Smi(6)));
    assert_eq!(rejected.reason(), Some(Value::String("kept".to_string())));
}

#[test]
fn test_aggregating_deferred_sources_with_all_settled() {
    let event_loop = EventLoop::new();
    let queue = event_loop.microtask_queue();
    let first = Deferred::new(&queue);
    let second = Deferred::new(&queue);
    let third = Deferred::new(&queue);

    let report = Promise::all_settled(
        &queue,
        vec![
            first.promise.to_value(),
            second.promise.to_value(),
            third.promise.to_value(),
        ],
    );

    third.resolve.settle(Value::Smi(3));
    first.reject.settle(Value::String("lost".to_string()));
    second.resolve.settle(Value::Smi(2));
    event_loop.run_until_done();

    let Some(Value::List(records)) = report.result() else {
        panic!("expected a fulfilled record list, got {:?}", report.result());
    };
    let statuses: Vec<Value> = records
        .iter()
        .map(|record| {
            let Value::Object(object) = record else {
                panic!("expected object records");
            };
            object.clone().get("status").expect("records never raise")
        })
        .collect();
    assert_eq!(
        statuses,
        vec![
            Value::String("rejected".to_string()),
            Value::String("fulfilled".to_string()),
            Value::String("fulfilled".to_string()),
        ]
    );
}
