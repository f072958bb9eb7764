//! Promise implementation.
//!
//! This module provides the one-shot deferred-value primitive: a promise is
//! created pending, settles at most once to fulfilled or rejected, and
//! notifies its observers through the microtask queue it was constructed
//! with. Settlement authority is handed out as explicit capability handles
//! rather than exposed as methods on the promise itself.

use core_types::{NativeFunction, ObjectLike, ScriptError, Value};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::resolve::resolve_value;
use crate::task_queue::{Microtask, MicrotaskQueue};

/// The state of a promise.
///
/// Promises transition at most once away from `Pending`; once `Fulfilled`
/// or `Rejected` the state never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; neither fulfilled nor rejected.
    Pending,
    /// The promise settled with a value.
    Fulfilled,
    /// The promise settled with a rejection reason.
    Rejected,
}

/// A callback receiving the settled payload of a promise.
pub type SettleCallback = Box<dyn FnOnce(Value)>;

/// The subscription capability of a first-class promise.
///
/// `subscribe` registers a pair of callbacks for the two possible outcomes.
/// Exactly one of them will run, at most once, and always through the
/// microtask queue — even when the promise is already settled at
/// subscription time, the callback never runs before the current
/// synchronous call stack completes. Callbacks registered while pending are
/// notified in registration order.
pub trait Thenable {
    /// Registers callbacks for fulfillment and rejection.
    fn subscribe(&self, on_fulfilled: SettleCallback, on_rejected: SettleCallback);
}

type Observer = Box<dyn FnOnce(Value)>;

enum State {
    Pending {
        fulfill_observers: Vec<Observer>,
        reject_observers: Vec<Observer>,
    },
    Fulfilled(Value),
    Rejected(Value),
}

pub(crate) struct Inner {
    queue: MicrotaskQueue,
    state: RefCell<State>,
}

/// A one-shot observable deferred value.
///
/// `Promise` is a cheap cloneable handle; clones observe the same
/// settlement. A promise is bound at construction to the microtask queue it
/// schedules its reactions on.
///
/// # Examples
///
/// ```
/// use core_types::Value;
/// use promise_runtime::{EventLoop, Promise, PromiseState};
///
/// let event_loop = EventLoop::new();
/// let queue = event_loop.microtask_queue();
///
/// let promise = Promise::with_executor(&queue, |resolve, _reject| {
///     resolve.settle(Value::Smi(42));
///     Ok(())
/// });
/// assert_eq!(promise.state(), PromiseState::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    inner: Rc<Inner>,
}

impl Promise {
    /// Creates a new pending promise bound to the given microtask queue.
    pub fn new(queue: &MicrotaskQueue) -> Self {
        Self {
            inner: Rc::new(Inner {
                queue: queue.clone(),
                state: RefCell::new(State::Pending {
                    fulfill_observers: Vec::new(),
                    reject_observers: Vec::new(),
                }),
            }),
        }
    }

    /// Creates a promise and runs `executor` synchronously with its two
    /// settle handles.
    ///
    /// An `Err` return from the executor rejects the promise with that
    /// failure, unless the executor already settled it — the first
    /// settlement always wins.
    pub fn with_executor<F>(queue: &MicrotaskQueue, executor: F) -> Self
    where
        F: FnOnce(ResolveHandle, RejectHandle) -> Result<(), ScriptError>,
    {
        let promise = Self::new(queue);
        let resolve = ResolveHandle::bind(promise.clone());
        let reject = RejectHandle::bind(promise.clone());
        if let Err(error) = executor(resolve, reject) {
            promise.reject_with(Value::Error(error));
        }
        promise
    }

    /// Returns a promise settled from `value`.
    ///
    /// A first-class promise is returned as-is. A thenable is adopted; any
    /// other value yields an already-fulfilled promise.
    pub fn resolve(queue: &MicrotaskQueue, value: Value) -> Self {
        if let Some(existing) = Self::from_value(&value) {
            return existing;
        }
        let promise = Self::new(queue);
        resolve_value(&promise, value);
        promise
    }

    /// Returns a promise immediately rejected with `reason`.
    ///
    /// The reason is never inspected, even if it is itself a promise or a
    /// thenable.
    pub fn reject(queue: &MicrotaskQueue, reason: Value) -> Self {
        let promise = Self::new(queue);
        promise.reject_with(reason);
        promise
    }

    /// Returns the current state.
    pub fn state(&self) -> PromiseState {
        match &*self.inner.state.borrow() {
            State::Pending { .. } => PromiseState::Pending,
            State::Fulfilled(_) => PromiseState::Fulfilled,
            State::Rejected(_) => PromiseState::Rejected,
        }
    }

    /// Returns the fulfillment value, if fulfilled.
    pub fn result(&self) -> Option<Value> {
        match &*self.inner.state.borrow() {
            State::Fulfilled(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Returns the rejection reason, if rejected.
    pub fn reason(&self) -> Option<Value> {
        match &*self.inner.state.borrow() {
            State::Rejected(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Returns whether two handles observe the same promise.
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Wraps this promise as an object-like [`Value`].
    ///
    /// The wrapping preserves identity: converting back with
    /// [`Promise::from_value`] yields a handle to the same promise.
    pub fn to_value(&self) -> Value {
        Value::Object(self.inner.clone())
    }

    /// Recovers a promise handle from a [`Value`], if the value holds one.
    pub fn from_value(value: &Value) -> Option<Promise> {
        let Value::Object(object) = value else {
            return None;
        };
        object
            .clone()
            .as_any()
            .downcast::<Inner>()
            .ok()
            .map(|inner| Promise { inner })
    }

    /// Registers handlers and returns the derived downstream promise.
    ///
    /// The downstream promise settles from the applicable handler's result:
    /// a returned value goes through the resolution procedure (so returned
    /// promises and thenables flatten into the chain), a raised failure
    /// rejects downstream. A missing fulfillment handler passes the value
    /// through; a missing rejection handler re-raises the reason unchanged,
    /// so rejections propagate through handler-less links.
    ///
    /// Handlers never run synchronously inside `then`, even when this
    /// promise is already settled.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{NativeFunction, Value};
    /// use promise_runtime::{EventLoop, Promise};
    ///
    /// let event_loop = EventLoop::new();
    /// let queue = event_loop.microtask_queue();
    ///
    /// let doubled = Promise::resolve(&queue, Value::Smi(21)).then(
    ///     Some(NativeFunction::new(|args| match args.first() {
    ///         Some(Value::Smi(n)) => Ok(Value::Smi(n * 2)),
    ///         _ => Ok(Value::Undefined),
    ///     })),
    ///     None,
    /// );
    /// event_loop.run_until_done();
    /// assert_eq!(doubled.result(), Some(Value::Smi(42)));
    /// ```
    pub fn then(
        &self,
        on_fulfilled: Option<NativeFunction>,
        on_rejected: Option<NativeFunction>,
    ) -> Promise {
        let downstream = Promise::new(&self.inner.queue);
        let fulfilled_side = downstream.clone();
        let rejected_side = downstream.clone();
        self.subscribe(
            Box::new(move |value| match on_fulfilled {
                Some(handler) => match handler.call(vec![value]) {
                    Ok(output) => resolve_value(&fulfilled_side, output),
                    Err(error) => fulfilled_side.reject_with(Value::Error(error)),
                },
                None => resolve_value(&fulfilled_side, value),
            }),
            Box::new(move |reason| match on_rejected {
                Some(handler) => match handler.call(vec![reason]) {
                    Ok(output) => resolve_value(&rejected_side, output),
                    Err(error) => rejected_side.reject_with(Value::Error(error)),
                },
                None => rejected_side.reject_with(reason),
            }),
        );
        downstream
    }

    /// Registers a rejection handler; sugar for `then(None, Some(handler))`.
    ///
    /// Raises a `TypeError` synchronously if `on_rejected` is not callable —
    /// there is no downstream promise yet to carry the rejection.
    pub fn catch(&self, on_rejected: Value) -> Result<Promise, ScriptError> {
        match on_rejected {
            Value::Function(handler) => Ok(self.then(None, Some(handler))),
            other => Err(ScriptError::type_error(format!(
                "catch handler must be callable, got {}",
                other.type_of()
            ))),
        }
    }

    /// Runs `on_finally` with no arguments on either outcome and mirrors the
    /// original outcome afterwards.
    ///
    /// The callback's return value is coerced into a gate promise; the
    /// original outcome is re-delivered only once the gate fulfills, so an
    /// asynchronously-completing callback defers the chain. A raising
    /// callback, or a rejecting gate, supersedes the original outcome.
    pub fn finally(&self, on_finally: NativeFunction) -> Promise {
        let downstream = Promise::new(&self.inner.queue);
        let queue = self.inner.queue.clone();
        let fulfilled_queue = queue.clone();
        let settled = downstream.clone();
        let failed = downstream.clone();
        let callback = on_finally.clone();
        self.subscribe(
            Box::new(move |value| match callback.call(Vec::new()) {
                Ok(gate_value) => {
                    let gate = Promise::resolve(&fulfilled_queue, gate_value);
                    let deliver = settled.clone();
                    let supersede = settled.clone();
                    gate.subscribe(
                        Box::new(move |_| resolve_value(&deliver, value)),
                        Box::new(move |gate_reason| supersede.reject_with(gate_reason)),
                    );
                }
                Err(error) => settled.reject_with(Value::Error(error)),
            }),
            Box::new(move |reason| match on_finally.call(Vec::new()) {
                Ok(gate_value) => {
                    let gate = Promise::resolve(&queue, gate_value);
                    let deliver = failed.clone();
                    let supersede = failed.clone();
                    gate.subscribe(
                        Box::new(move |_| deliver.reject_with(reason)),
                        Box::new(move |gate_reason| supersede.reject_with(gate_reason)),
                    );
                }
                Err(error) => failed.reject_with(Value::Error(error)),
            }),
        );
        downstream
    }

    /// Settles this promise as fulfilled. No-op unless pending.
    pub(crate) fn fulfill_with(&self, value: Value) {
        let observers = {
            let mut state = self.inner.state.borrow_mut();
            let State::Pending {
                fulfill_observers, ..
            } = &mut *state
            else {
                return;
            };
            let observers = mem::take(fulfill_observers);
            // Replacing the state drops the rejection observers unrun.
            *state = State::Fulfilled(value.clone());
            observers
        };
        for observer in observers {
            observer(value.clone());
        }
    }

    /// Settles this promise as rejected. No-op unless pending.
    pub(crate) fn reject_with(&self, reason: Value) {
        let observers = {
            let mut state = self.inner.state.borrow_mut();
            let State::Pending {
                reject_observers, ..
            } = &mut *state
            else {
                return;
            };
            let observers = mem::take(reject_observers);
            *state = State::Rejected(reason.clone());
            observers
        };
        for observer in observers {
            observer(reason.clone());
        }
    }
}

impl Thenable for Promise {
    fn subscribe(&self, on_fulfilled: SettleCallback, on_rejected: SettleCallback) {
        let mut state = self.inner.state.borrow_mut();
        match &mut *state {
            State::Pending {
                fulfill_observers,
                reject_observers,
            } => {
                // Observers run inside the settle routine; the extra hop
                // through the queue keeps handler execution deferred even
                // for promises that settle synchronously.
                let queue = self.inner.queue.clone();
                fulfill_observers.push(Box::new(move |value| {
                    queue.enqueue(Microtask::new(move || on_fulfilled(value)));
                }));
                let queue = self.inner.queue.clone();
                reject_observers.push(Box::new(move |reason| {
                    queue.enqueue(Microtask::new(move || on_rejected(reason)));
                }));
            }
            State::Fulfilled(value) => {
                let value = value.clone();
                self.inner
                    .queue
                    .enqueue(Microtask::new(move || on_fulfilled(value)));
            }
            State::Rejected(reason) => {
                let reason = reason.clone();
                self.inner
                    .queue
                    .enqueue(Microtask::new(move || on_rejected(reason)));
            }
        }
    }
}

impl ObjectLike for Inner {
    fn get(self: Rc<Self>, key: &str) -> Result<Value, ScriptError> {
        match key {
            // A first-class promise answers the duck-typed probe with a
            // bound subscription member, so foreign code can adopt it like
            // any other thenable.
            "then" => {
                let promise = Promise { inner: self };
                Ok(Value::Function(NativeFunction::new(move |args| {
                    let mut args = args.into_iter();
                    let on_fulfilled = handler_from(args.next());
                    let on_rejected = handler_from(args.next());
                    Ok(promise.then(on_fulfilled, on_rejected).to_value())
                })))
            }
            _ => Ok(Value::Undefined),
        }
    }

    fn as_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

fn handler_from(argument: Option<Value>) -> Option<NativeFunction> {
    match argument {
        Some(Value::Function(handler)) => Some(handler),
        _ => None,
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// The capability to fulfill one promise.
///
/// Clones share the same one-shot authority: the first settlement through
/// any resolve or reject handle of a promise wins, every later call is a
/// no-op.
#[derive(Clone, Debug)]
pub struct ResolveHandle {
    target: Promise,
}

impl ResolveHandle {
    pub(crate) fn bind(target: Promise) -> Self {
        Self { target }
    }

    /// Fulfills the promise with `value`. No-op if already settled.
    pub fn settle(&self, value: Value) {
        self.target.fulfill_with(value);
    }
}

/// The capability to reject one promise.
///
/// Shares the same one-shot authority as [`ResolveHandle`].
#[derive(Clone, Debug)]
pub struct RejectHandle {
    target: Promise,
}

impl RejectHandle {
    pub(crate) fn bind(target: Promise) -> Self {
        Self { target }
    }

    /// Rejects the promise with `reason`. No-op if already settled.
    pub fn settle(&self, reason: Value) {
        self.target.reject_with(reason);
    }
}
