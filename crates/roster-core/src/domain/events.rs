//! Events - 状態変更が確定した後に出るドメインイベント

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TaskId, UserId};
use super::profile::Credits;

/// DomainEvent は EventSink に渡されるイベント
///
/// JSON では `"event"` フィールドにバリアント名（snake_case）が入る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    ProfileUpdated {
        user: UserId,
        /// この update でレコードが作られたら `true`
        created: bool,
    },
    TaskScheduled {
        task_id: TaskId,
        user: UserId,
        due_at: DateTime<Utc>,
        /// replace ポリシーで置き換えた pending タスクの ID
        replaced: Option<TaskId>,
    },
    TaskApplied {
        task_id: TaskId,
        user: UserId,
        count: Credits,
    },
}

impl DomainEvent {
    /// イベントの対象 principal
    pub fn user(&self) -> &UserId {
        match self {
            DomainEvent::ProfileUpdated { user, .. }
            | DomainEvent::TaskScheduled { user, .. }
            | DomainEvent::TaskApplied { user, .. } => user,
        }
    }
}
