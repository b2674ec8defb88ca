#![forbid(unsafe_code)]

//! Deferred execution on the host event loop.
//!
//! "Deferred" means *later turn*, not another thread: actions scheduled
//! during one event-loop turn run in scheduling order, strictly after that
//! turn. There is no cancellation — a deferred action that finds its target
//! destroyed must validity-check and become a no-op.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Schedules an action for a later turn of the host event loop.
pub trait Scheduler {
    fn schedule(&self, action: Box<dyn FnOnce()>);
}

/// FIFO scheduler for tests and non-GUI hosts.
///
/// Actions accumulate until [`run_until_idle`](Self::run_until_idle)
/// drains them; actions scheduled while draining run in the same drain,
/// after everything scheduled before them.
#[derive(Clone, Default)]
pub struct QueueScheduler {
    queue: Rc<RefCell<VecDeque<Box<dyn FnOnce()>>>>,
}

impl fmt::Debug for QueueScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl QueueScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run queued actions in scheduling order until the queue is empty.
    /// Returns how many actions ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let action = self.queue.borrow_mut().pop_front();
            match action {
                Some(action) => {
                    action();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for QueueScheduler {
    fn schedule(&self, action: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push_back(action);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
