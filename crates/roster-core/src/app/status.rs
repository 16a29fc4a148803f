//! Status - キューのスナップショット

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// QueueStatus は `Registry::status()` の戻り値
///
/// # 使用例
/// ```ignore
/// let status = registry.status();
/// if status.is_idle() {
///     println!("next due at {:?}", status.next_due_at);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// スナップショットを取った時刻（Clock の値）
    pub at: DateTime<Utc>,
    pub profiles: usize,
    /// キューに残っているタスク数（due かどうかは問わない）
    pub pending: usize,
    /// そのうち、今 tick すれば適用されるもの
    pub due: usize,
    pub next_due_at: Option<DateTime<Utc>>,
}

impl QueueStatus {
    /// `at` 時点の tick が `NothingToDo` になるか
    pub fn is_idle(&self) -> bool {
        self.due == 0
    }
}
