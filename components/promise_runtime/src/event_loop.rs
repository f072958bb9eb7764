//! Event loop implementation.
//!
//! This module provides the host loop that coordinates task and microtask
//! execution. Each turn runs the oldest task, then drains the microtask
//! queue to exhaustion before the next task starts, so promise reactions
//! always run after the synchronous work that scheduled them and before any
//! longer-deferred work.

use crate::task_queue::{Microtask, MicrotaskQueue, Task, TaskQueue};

/// The host event loop.
///
/// Each iteration (turn) of the loop:
/// 1. Takes the oldest task from the task queue and executes it
/// 2. Drains all microtasks in the microtask queue
/// 3. Repeats
///
/// Promises schedule their reactions on the microtask queue; hand them the
/// handle returned by [`EventLoop::microtask_queue`].
///
/// # Examples
///
/// ```
/// use promise_runtime::{EventLoop, Task};
///
/// let event_loop = EventLoop::new();
/// event_loop.enqueue_task(Task::new(|| {}));
/// event_loop.run_until_done();
/// assert!(event_loop.is_task_queue_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventLoop {
    tasks: TaskQueue,
    microtasks: MicrotaskQueue,
}

impl EventLoop {
    /// Creates a new event loop with empty queues.
    pub fn new() -> Self {
        Self {
            tasks: TaskQueue::new(),
            microtasks: MicrotaskQueue::new(),
        }
    }

    /// Returns a shared handle to the task queue.
    pub fn task_queue(&self) -> TaskQueue {
        self.tasks.clone()
    }

    /// Returns a shared handle to the microtask queue.
    ///
    /// This is the scheduling collaborator promises are constructed with.
    pub fn microtask_queue(&self) -> MicrotaskQueue {
        self.microtasks.clone()
    }

    /// Adds a task to the task queue.
    ///
    /// The task will be executed on the next available turn of the loop.
    pub fn enqueue_task(&self, task: Task) {
        self.tasks.enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    ///
    /// The microtask will be executed after the current task completes.
    pub fn enqueue_microtask(&self, microtask: Microtask) {
        self.microtasks.enqueue(microtask);
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.microtasks.is_empty()
    }

    /// Runs the event loop until both queues are exhausted.
    pub fn run_until_done(&self) {
        while !self.tasks.is_empty() || !self.microtasks.is_empty() {
            if let Some(task) = self.tasks.dequeue() {
                task.run();
            }
            self.run_all_microtasks();
        }
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// Microtasks enqueued by a running microtask are processed in the same
    /// drain, before this method returns.
    pub fn run_all_microtasks(&self) {
        while let Some(microtask) = self.microtasks.dequeue() {
            microtask.run();
        }
    }

    /// Processes one complete turn: one task followed by all microtasks.
    pub fn process_one_cycle(&self) {
        if let Some(task) = self.tasks.dequeue() {
            task.run();
        }
        self.run_all_microtasks();
    }
}
