//! State - 読み取りクエリから見たタスクの状態

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::ScheduledTask;

/// キューに残っているタスクの状態
///
/// # 状態遷移
/// - Pending → Due（時刻が `due_at` に達した）
/// - Due → （削除）tick で適用された
///
/// キャンセルや期限切れの状態はない。Due のタスクは drain されるまで Due のまま。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Due,
}

impl TaskState {
    pub fn of(task: &ScheduledTask, now: DateTime<Utc>) -> Self {
        if task.is_due(now) {
            TaskState::Due
        } else {
            TaskState::Pending
        }
    }
}
