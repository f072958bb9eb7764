//! Deferred factory.

use crate::promise::{Promise, RejectHandle, ResolveHandle};
use crate::task_queue::MicrotaskQueue;

/// A promise together with its externally callable settle handles.
///
/// This bridges sources that cannot use the executor-based constructor: the
/// promise is handed to consumers while the handles travel to whatever code
/// will eventually learn the outcome.
///
/// # Examples
///
/// ```
/// use core_types::Value;
/// use promise_runtime::{Deferred, EventLoop, PromiseState};
///
/// let event_loop = EventLoop::new();
/// let deferred = Deferred::new(&event_loop.microtask_queue());
/// assert_eq!(deferred.promise.state(), PromiseState::Pending);
///
/// deferred.resolve.settle(Value::Smi(1));
/// assert_eq!(deferred.promise.result(), Some(Value::Smi(1)));
/// ```
#[derive(Clone, Debug)]
pub struct Deferred {
    /// The promise observers subscribe to.
    pub promise: Promise,
    /// Fulfills the promise.
    pub resolve: ResolveHandle,
    /// Rejects the promise.
    pub reject: RejectHandle,
}

impl Deferred {
    /// Creates a pending promise along with its settle handles.
    pub fn new(queue: &MicrotaskQueue) -> Self {
        let promise = Promise::new(queue);
        let resolve = ResolveHandle::bind(promise.clone());
        let reject = RejectHandle::bind(promise.clone());
        Self {
            promise,
            resolve,
            reject,
        }
    }
}
