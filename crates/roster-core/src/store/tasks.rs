//! In-memory `tasks` table with a due-time index.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Utc};

use crate::domain::{ScheduledTask, TaskId, UserId};

/// Heap entry.
///
/// Ordering is reversed so `BinaryHeap` pops the earliest `due_at` first.
/// Ties break on task id. Ids from one `UlidGenerator` are monotonic, so
/// equal due times drain in enqueue order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DueEntry {
    due_at: DateTime<Utc>,
    task_id: TaskId,
    user: UserId,
}

impl PartialOrd for DueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_at
            .cmp(&self.due_at)
            .then_with(|| other.task_id.cmp(&self.task_id))
    }
}

/// `UserId -> ScheduledTask`, at most one pending task per user.
///
/// Invariant: `by_due` holds exactly one entry per row of `tasks`, with the
/// same id and due time.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: HashMap<UserId, ScheduledTask>,
    by_due: BinaryHeap<DueEntry>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &UserId) -> Option<&ScheduledTask> {
        self.tasks.get(user)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Insert `task`, returning the pending task it displaced, if any.
    pub fn insert(&mut self, task: ScheduledTask) -> Option<ScheduledTask> {
        let entry = DueEntry {
            due_at: task.due_at,
            task_id: task.id,
            user: task.user.clone(),
        };
        let replaced = self.tasks.insert(task.user.clone(), task);
        if let Some(old) = &replaced {
            self.by_due.retain(|e| e.task_id != old.id);
        }
        self.by_due.push(entry);
        replaced
    }

    /// Earliest due time in the queue.
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.by_due.peek().map(|e| e.due_at)
    }

    /// Due tasks, earliest first. Read-only.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<&ScheduledTask> {
        let mut due: Vec<&ScheduledTask> = self.tasks.values().filter(|t| t.is_due(now)).collect();
        due.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.id.cmp(&b.id)));
        due
    }

    /// Remove and return the earliest task if it is due.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<ScheduledTask> {
        let head = self.by_due.peek()?;
        if head.due_at > now {
            return None; // heap is ordered, nothing behind it is due either
        }
        let head = self.by_due.pop()?;
        self.tasks.remove(&head.user)
    }
}
