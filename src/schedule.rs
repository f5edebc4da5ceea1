//! Deferred tasks driven by an external millisecond clock.
//!
//! Transition cleanup, stack fade-out, tab bar auto-hide and onboarding all
//! run "some milliseconds later". Instead of callbacks, callers schedule a
//! task value and get a [`TaskHandle`] back; [`Scheduler::pop_next_due`] hands
//! due tasks back one at a time in deadline order. Handles can be cancelled at any time, and
//! cancelling a task that already ran is a no-op.
//!
//! The clock only moves when the owner says so, which keeps the whole viewer
//! deterministic under test.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    /// Keyed by (deadline, id) so equal deadlines run in scheduling order.
    pending: BTreeMap<(u64, u64), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` `delay_ms` after the current time.
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert((self.now_ms + delay_ms, id), task);
        TaskHandle(id)
    }

    /// Cancel a pending task. Returns the task if it had not run yet.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let key = self.pending.keys().find(|(_, id)| *id == handle.0).copied()?;
        self.pending.remove(&key)
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.keys().any(|(_, id)| *id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Pop the single earliest task due by `now_ms`, moving the clock to its
    /// deadline. With nothing due the clock moves to `now_ms`, so delays
    /// scheduled after an idle stretch count from the caller's time.
    ///
    /// Owners run tasks one at a time because a task may schedule more work
    /// that is due within the same window. The clock never runs backwards.
    pub fn pop_next_due(&mut self, now_ms: u64) -> Option<T> {
        let now_ms = now_ms.max(self.now_ms);
        match self.pending.keys().next().copied() {
            Some((due, id)) if due <= now_ms => {
                self.now_ms = due;
                self.pending.remove(&(due, id))
            }
            _ => {
                self.now_ms = now_ms;
                None
            }
        }
    }
}
