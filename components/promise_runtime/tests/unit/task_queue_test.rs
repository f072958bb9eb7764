//! Unit tests for the task and microtask queues

use promise_runtime::{Microtask, MicrotaskQueue, Task, TaskQueue};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn new_queues_are_empty() {
    assert!(TaskQueue::new().is_empty());
    assert!(MicrotaskQueue::new().is_empty());
    assert_eq!(TaskQueue::new().len(), 0);
}

#[test]
fn tasks_run_in_enqueue_order() {
    let queue = TaskQueue::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    for n in 1..=3 {
        let o = order.clone();
        queue.enqueue(Task::new(move || o.borrow_mut().push(n)));
    }
    assert_eq!(queue.len(), 3);

    while let Some(task) = queue.dequeue() {
        task.run();
    }
    assert_eq!(*order.borrow(), vec![1, 2, 3]);
}

#[test]
fn microtasks_run_in_enqueue_order() {
    let queue = MicrotaskQueue::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    for n in 1..=3 {
        let o = order.clone();
        queue.enqueue(Microtask::new(move || o.borrow_mut().push(n)));
    }

    while let Some(microtask) = queue.dequeue() {
        microtask.run();
    }
    assert_eq!(*order.borrow(), vec![1, 2, 3]);
}

#[test]
fn cloned_handles_share_the_queue() {
    let queue = MicrotaskQueue::new();
    let handle = queue.clone();

    handle.enqueue(Microtask::new(|| {}));
    queue.enqueue(Microtask::new(|| {}));
    assert_eq!(queue.len(), 2);
    assert_eq!(handle.len(), 2);

    handle.dequeue().expect("shared item").run();
    assert_eq!(queue.len(), 1);
}

#[test]
fn enqueue_from_a_running_callback_is_appended() {
    let queue = MicrotaskQueue::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let o = order.clone();
    let nested_queue = queue.clone();
    queue.enqueue(Microtask::new(move || {
        o.borrow_mut().push("outer");
        let o = o.clone();
        nested_queue.enqueue(Microtask::new(move || o.borrow_mut().push("nested")));
    }));
    let o = order.clone();
    queue.enqueue(Microtask::new(move || o.borrow_mut().push("sibling")));

    while let Some(microtask) = queue.dequeue() {
        microtask.run();
    }
    assert_eq!(*order.borrow(), vec!["outer", "sibling", "nested"]);
}

#[test]
fn dequeue_on_empty_returns_none() {
    let queue = TaskQueue::new();
    assert!(queue.dequeue().is_none());
}
