//! Task and microtask queue management.
//!
//! This module provides the task and microtask queues drained by the event
//! loop. Queues have shared-handle semantics: cloning a queue yields another
//! handle to the same underlying FIFO, which is how promises enqueue
//! reactions while the loop is draining.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// A task to be executed by the event loop.
///
/// Tasks represent the host's longer-deferred work: one task runs per loop
/// turn, with the microtask queue drained in between.
pub struct Task {
    callback: Box<dyn FnOnce()>,
}

impl Task {
    /// Creates a new task from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task, consuming it.
    pub fn run(self) {
        (self.callback)()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A microtask to be executed by the event loop.
///
/// Microtasks run after the current task completes and before the next task
/// starts. Promise reactions are scheduled here.
pub struct Microtask {
    callback: Box<dyn FnOnce()>,
}

impl Microtask {
    /// Creates a new microtask from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the microtask, consuming it.
    pub fn run(self) {
        (self.callback)()
    }
}

impl fmt::Debug for Microtask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Microtask {{ ... }}")
    }
}

/// A FIFO queue of tasks.
///
/// Cloning returns another handle to the same queue. Enqueuing from within a
/// running callback appends behind everything already queued.
#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task to the end of the queue and returns immediately.
    pub fn enqueue(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&self) -> Option<Task> {
        self.queue.borrow_mut().pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Returns the number of queued tasks.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// A FIFO queue of microtasks.
///
/// Cloning returns another handle to the same queue; promises hold such a
/// handle and schedule every reaction through it.
#[derive(Clone, Debug, Default)]
pub struct MicrotaskQueue {
    queue: Rc<RefCell<VecDeque<Microtask>>>,
}

impl MicrotaskQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a microtask to the end of the queue and returns immediately.
    pub fn enqueue(&self, microtask: Microtask) {
        self.queue.borrow_mut().push_back(microtask);
    }

    /// Removes and returns the next microtask from the queue.
    pub fn dequeue(&self) -> Option<Microtask> {
        self.queue.borrow_mut().pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Returns the number of queued microtasks.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}
