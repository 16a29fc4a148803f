//! Errors - エラー型と分類
//!
//! どのバリアントも書き込み前の検証で検出される。
//! 失敗した呼び出しは状態を一切変更しない。

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::ids::UserId;

/// ErrorKind は [`RosterError`] の運用分類
///
/// # 分類
/// - Rejected: 権限なし（正しい caller で再送）
/// - Conflict: 既存の状態と衝突（解消を待つ）
/// - Idle: 今はやることがない（後でリトライ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Rejected,
    Conflict,
    Idle,
}

/// RosterError はエントリポイントのドメインエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("{caller} does not hold authority of {target}")]
    Unauthorized { caller: UserId, target: UserId },

    #[error("a task is already scheduled for {user} (due at {due_at})")]
    AlreadyScheduled { user: UserId, due_at: DateTime<Utc> },

    #[error("nothing to do: no scheduled task is due")]
    NothingToDo,

    #[error("crediting {user} would overflow the count")]
    CountOverflow { user: UserId },
}

impl RosterError {
    /// 運用分類を返す
    pub fn kind(&self) -> ErrorKind {
        match self {
            RosterError::Unauthorized { .. } => ErrorKind::Rejected,
            RosterError::AlreadyScheduled { .. } | RosterError::CountOverflow { .. } => {
                ErrorKind::Conflict
            }
            RosterError::NothingToDo => ErrorKind::Idle,
        }
    }
}
