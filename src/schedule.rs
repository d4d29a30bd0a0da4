//! Cancellable scheduled tasks.
//!
//! The UI runs on a single cooperative loop, so nothing here owns a thread or
//! a real timer. Tasks are queued with a deadline and handed back by
//! [`TimerQueue::drain_due`] once the caller's clock passes it. The caller
//! passes the current time in, which keeps the queue deterministic in tests.

use web_time::{Duration, Instant};

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TimerHandle,
    deadline: Instant,
    task: T,
}

/// A queue of tasks that become due at given instants.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to become due `delay` after `now`.
    ///
    /// # Returns
    ///
    /// A handle that can later be passed to [`TimerQueue::cancel`].
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Scheduled {
            handle,
            deadline: now + delay,
            task,
        });
        handle
    }

    /// Cancels a pending task.
    ///
    /// # Returns
    ///
    /// `true` if the task was still pending, `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Removes and returns every task whose deadline is at or before `now`,
    /// earliest deadline first (ties in scheduling order).
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.deadline, entry.handle.0));
        due.into_iter().map(|entry| entry.task).collect()
    }

    /// Earliest deadline among pending tasks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Whether `handle` is still pending.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
