#![forbid(unsafe_code)]

//! Cancellable timed tasks on virtual time.
//!
//! [`Scheduler`] replaces fire-and-forget `setTimeout` calls with owned,
//! inspectable entries. The coordinator advances time and pulls due tasks one
//! at a time with [`Scheduler::pop_due`], so a task that schedules another
//! task observes a consistent clock and the follow-up runs in the same
//! advance if it is already due.
//!
//! # Invariants
//!
//! - Tasks run in `(due, order)` order; `order` is the insertion sequence, so
//!   equal deadlines run first-scheduled first.
//! - The scheduler clock never moves backwards. Popping a task moves the
//!   clock to that task's deadline.
//! - A cancelled task is removed immediately and is never returned.
//!
//! # Failure Modes
//!
//! - `cancel` of an unknown or already-run id returns `false`.

use std::time::Duration;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TaskId,
    due: Duration,
    order: u64,
    task: T,
}

/// Snapshot of one pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTask {
    pub id: TaskId,
    pub due: Duration,
}

/// Timed task queue.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    next_order: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            next_order: 0,
            queue: Vec::new(),
        }
    }

    /// Current scheduler time.
    #[inline]
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to become due `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        self.queue.push(Scheduled {
            id,
            due,
            order: self.next_order,
            task,
        });
        self.next_order += 1;
        tracing::trace!(task = id.0, due_ms = due.as_millis() as u64, "timer scheduled");
        id
    }

    /// Remove a pending task. Returns whether it was pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.id != id);
        let removed = self.queue.len() != before;
        if removed {
            tracing::trace!(task = id.0, "timer cancelled");
        }
        removed
    }

    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.queue.iter().any(|entry| entry.id == id)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pending tasks sorted by execution order.
    #[must_use]
    pub fn pending_tasks(&self) -> Vec<PendingTask> {
        let mut entries: Vec<_> = self.queue.iter().collect();
        entries.sort_by_key(|entry| (entry.due, entry.order));
        entries
            .into_iter()
            .map(|entry| PendingTask {
                id: entry.id,
                due: entry.due,
            })
            .collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.iter().map(|entry| entry.due).min()
    }

    /// Remove and return the next task due at or before `limit`, moving the
    /// clock to its deadline.
    pub fn pop_due(&mut self, limit: Duration) -> Option<(TaskId, T)> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= limit)
            .min_by_key(|(_, entry)| (entry.due, entry.order))
            .map(|(index, _)| index)?;
        let entry = self.queue.remove(index);
        self.now = self.now.max(entry.due);
        Some((entry.id, entry.task))
    }

    /// Move the clock forward to `now`. Earlier values are ignored.
    pub fn advance_clock_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Drop every pending task, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let cleared = self.queue.len();
        self.queue.clear();
        cleared
    }
}
