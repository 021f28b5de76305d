#![forbid(unsafe_code)]

//! Single-threaded UI execution context.
//!
//! [`UiContext`] is the one place where deferred work is scheduled. It keeps
//! a logical clock that the host advances once per frame, and a queue of
//! messages due at a given logical time. Nothing ever blocks: a task that
//! wants to retry later schedules a new message instead.
//!
//! The context is deliberately `!Send` and records the thread it was created
//! on. Every entry point that mutates transition state calls
//! [`assert_affine`](UiContext::assert_affine), which checks the calling
//! thread in debug builds.
//!
//! # Invariants
//!
//! 1. Messages are delivered in due-time order; equal due times keep
//!    scheduling order.
//! 2. The logical clock never moves backwards.
//! 3. A message is delivered at most once.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::thread::{self, ThreadId};
use std::time::Duration;

/// Handle to a scheduled message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<M> {
    due: Duration,
    id: TaskId,
    message: M,
}

impl<M> PartialEq for Scheduled<M> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl<M> Eq for Scheduled<M> {}

impl<M> PartialOrd for Scheduled<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Scheduled<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest due first (min-heap), then earliest scheduled.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// A UI-affine scheduler with a logical clock.
#[derive(Debug)]
pub struct UiContext<M> {
    owner: ThreadId,
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Scheduled<M>>,
    cancelled: Vec<TaskId>,
    _not_send: PhantomData<Rc<()>>,
}

impl<M> Default for UiContext<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> UiContext<M> {
    /// Create a context owned by the calling thread.
    #[must_use]
    pub fn new() -> Self {
        Self {
            owner: thread::current().id(),
            now: Duration::ZERO,
            next_id: 1,
            queue: BinaryHeap::new(),
            cancelled: Vec::new(),
            _not_send: PhantomData,
        }
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of messages waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    /// Debug-only check that the caller runs on the owning thread.
    #[inline]
    pub fn assert_affine(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.owner,
            "UiContext used off its owning thread"
        );
    }

    /// Queue `message` for delivery `delay` from now.
    pub fn schedule(&mut self, delay: Duration, message: M) -> TaskId {
        self.assert_affine();
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(Scheduled {
            due: self.now + delay,
            id,
            message,
        });
        id
    }

    /// Queue `message` for the next drain.
    pub fn post(&mut self, message: M) -> TaskId {
        self.schedule(Duration::ZERO, message)
    }

    /// Drop a scheduled message. Returns `false` if it is unknown or already
    /// delivered.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if self.cancelled.contains(&id) || !self.queue.iter().any(|s| s.id == id) {
            return false;
        }
        self.cancelled.push(id);
        true
    }

    /// Move the clock forward by `dt` and return every message now due.
    pub fn advance(&mut self, dt: Duration) -> Vec<M> {
        self.assert_affine();
        self.now += dt;
        self.drain_due()
    }

    /// Return every message due at the current time, in order.
    pub fn drain_due(&mut self) -> Vec<M> {
        let mut out = Vec::new();
        while self.queue.peek().is_some_and(|s| s.due <= self.now) {
            let Some(next) = self.queue.pop() else {
                break;
            };
            if let Some(pos) = self.cancelled.iter().position(|id| *id == next.id) {
                self.cancelled.swap_remove(pos);
                continue;
            }
            out.push(next.message);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_due_order() {
        let mut ctx = UiContext::new();
        ctx.schedule(Duration::from_millis(32), "late");
        ctx.schedule(Duration::from_millis(16), "early");
        ctx.post("now");
        assert_eq!(ctx.drain_due(), vec!["now"]);
        assert_eq!(ctx.advance(Duration::from_millis(40)), vec!["early", "late"]);
        assert_eq!(ctx.pending(), 0);
    }

    #[test]
    fn equal_due_keeps_schedule_order() {
        let mut ctx = UiContext::new();
        for n in 0..5 {
            ctx.schedule(Duration::from_millis(10), n);
        }
        assert_eq!(ctx.advance(Duration::from_millis(10)), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn not_due_stays_queued() {
        let mut ctx = UiContext::new();
        ctx.schedule(Duration::from_millis(16), ());
        assert!(ctx.advance(Duration::from_millis(15)).is_empty());
        assert_eq!(ctx.pending(), 1);
        assert_eq!(ctx.advance(Duration::from_millis(1)).len(), 1);
    }

    #[test]
    fn cancelled_message_skipped() {
        let mut ctx = UiContext::new();
        let id = ctx.post(1);
        ctx.post(2);
        assert!(ctx.cancel(id));
        assert!(!ctx.cancel(id));
        assert_eq!(ctx.pending(), 1);
        assert_eq!(ctx.drain_due(), vec![2]);
        assert!(!ctx.cancel(id));
    }

    #[test]
    fn clock_accumulates() {
        let mut ctx: UiContext<()> = UiContext::new();
        ctx.advance(Duration::from_millis(10));
        ctx.advance(Duration::from_millis(6));
        assert_eq!(ctx.now(), Duration::from_millis(16));
    }
}
