//! Deferred-value runtime for the Eventide engine.
//!
//! This crate provides the single-threaded promise protocol:
//! - [`EventLoop`] - Host loop with task and microtask queues
//! - [`Promise`] - One-shot observable deferred value with chaining,
//!   adoption of foreign thenables, and combinators
//! - [`Deferred`] - Factory exposing a promise's settle handles to
//!   external code
//!
//! # Overview
//!
//! A promise is bound at construction to a [`MicrotaskQueue`] handle and
//! schedules every handler invocation through it, so handlers always run
//! after the synchronous work that registered them. Settlement is
//! monotonic: the first transition away from pending wins and everything
//! later is a no-op.
//!
//! # Examples
//!
//! ```
//! use core_types::{NativeFunction, Value};
//! use promise_runtime::{EventLoop, Promise};
//!
//! let event_loop = EventLoop::new();
//! let queue = event_loop.microtask_queue();
//!
//! let greeting = Promise::resolve(&queue, Value::String("hello".to_string()))
//!     .then(
//!         Some(NativeFunction::new(|args| match args.first() {
//!             Some(Value::String(s)) => Ok(Value::String(format!("{s}, world"))),
//!             _ => Ok(Value::Undefined),
//!         })),
//!         None,
//!     );
//!
//! event_loop.run_until_done();
//! assert_eq!(
//!     greeting.result(),
//!     Some(Value::String("hello, world".to_string()))
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod combinator;
pub mod deferred;
pub mod event_loop;
pub mod promise;
mod resolve;
pub mod task_queue;

// Re-export main types at crate root
pub use deferred::Deferred;
pub use event_loop::EventLoop;
pub use promise::{
    Promise, PromiseState, RejectHandle, ResolveHandle, SettleCallback, Thenable,
};
pub use task_queue::{Microtask, MicrotaskQueue, Task, TaskQueue};
