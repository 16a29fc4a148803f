//! EventSink port - ドメインイベントの出力先
//!
//! # 実装
//! - **NoopEventSink**: 捨てる
//! - **TracingEventSink**: `tracing` の構造化ログ（デフォルト）
//! - **MemoryEventSink**: メモリに溜める（テスト用）

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::domain::DomainEvent;

/// EventSink はドメインイベントを記録
///
/// 状態変更が完了した後にだけ呼ばれる。失敗した呼び出しでは呼ばれない。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &DomainEvent);
}

/// 何もしない
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &DomainEvent) {}
}

/// イベントごとに `tracing` の構造化レコードを書く
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &DomainEvent) {
        match event {
            DomainEvent::ProfileUpdated { user, created } => {
                info!(%user, created, "profile updated");
            }
            DomainEvent::TaskScheduled {
                task_id,
                user,
                due_at,
                replaced,
            } => {
                info!(%task_id, %user, %due_at, replaced = ?replaced, "task scheduled");
            }
            DomainEvent::TaskApplied {
                task_id,
                user,
                count,
            } => {
                info!(%task_id, %user, %count, "task applied");
            }
        }
    }
}

/// イベントをメモリに保持。clone 同士は同じバッファを共有する
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに記録したイベントのスナップショット
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Take and clear the buffer.
    pub fn drain(&self) -> Vec<DomainEvent> {
        std::mem::take(
            &mut *self
                .events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &DomainEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
