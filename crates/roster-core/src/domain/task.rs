use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{TaskId, UserId};

/// What a task does when it is applied.
///
/// Only one kind exists: credit the owner with the worker reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    CreditReward,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::CreditReward => f.write_str("credit_reward"),
        }
    }
}

/// One row of the `tasks` table.
///
/// Created by `schedule`, removed by the `tick` that applies it, never
/// mutated in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub user: UserId,
    pub kind: TaskKind,
    pub scheduled_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl ScheduledTask {
    pub fn new(id: TaskId, user: UserId, scheduled_at: DateTime<Utc>, delay: chrono::Duration) -> Self {
        Self {
            id,
            user,
            kind: TaskKind::CreditReward,
            scheduled_at,
            due_at: scheduled_at
                .checked_add_signed(delay)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// `due_at` is a floor: once reached the task stays due until drained.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}
