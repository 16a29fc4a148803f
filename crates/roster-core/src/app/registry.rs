//! Registry - すべてのエントリポイントの背後にある唯一の状態オブジェクト
//!
//! `profiles` / `tasks` テーブルとホストの port を所有する。
//! 更新系メソッドはすべて `&mut self` を取るので、排他アクセスは
//! コンパイル時に保証される。共有したいホストは Mutex で包む
//! （[`crate::app::Ticker`] を参照）。
//!
//! # 不変条件
//! - 3 つのエントリポイントはすべて「検証してから書く」
//! - `Err` を返した呼び出しは何も変更していない

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::builder::RegistryBuilder;
use super::status::QueueStatus;
use crate::config::CollisionPolicy;
use crate::domain::{
    Credits, DomainEvent, ProfileFields, ProfileRecord, RosterError, ScheduledTask, TaskId,
    TaskState, UserId,
};
use crate::ports::{Authority, Clock, EventSink, IdGenerator};
use crate::store::{ProfileStore, TaskQueue};

/// One task applied by a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTask {
    pub task_id: TaskId,
    pub user: UserId,
    pub due_at: DateTime<Utc>,
    /// Count after the credit.
    pub count: Credits,
}

/// What a successful tick did. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub caller: UserId,
    pub at: DateTime<Utc>,
    /// Earliest `due_at` first.
    pub applied: Vec<AppliedTask>,
}

pub struct Registry {
    pub(super) profiles: ProfileStore,
    pub(super) tasks: TaskQueue,
    pub(super) delay: Duration,
    pub(super) reward: Credits,
    pub(super) collision_policy: CollisionPolicy,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) authority: Arc<dyn Authority>,
    pub(super) ids: Box<dyn IdGenerator>,
    pub(super) events: Arc<dyn EventSink>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn reward(&self) -> Credits {
        self.reward
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    fn authorize(&self, caller: &UserId, target: &UserId, op: &'static str) -> Result<(), RosterError> {
        if self.authority.permits(caller, target) {
            return Ok(());
        }
        warn!(%caller, %target, op, "missing authority");
        Err(RosterError::Unauthorized {
            caller: caller.clone(),
            target: target.clone(),
        })
    }

    /// Create or overwrite `user`'s descriptive fields.
    pub fn update(
        &mut self,
        caller: &UserId,
        user: &UserId,
        fields: ProfileFields,
    ) -> Result<(), RosterError> {
        self.authorize(caller, user, "update")?;

        let now = self.clock.now();
        let created = self.profiles.upsert(user, fields, now);
        debug!(%user, created, "profile upserted");

        self.events.emit(&DomainEvent::ProfileUpdated {
            user: user.clone(),
            created,
        });
        Ok(())
    }

    /// Enqueue a reward task for `user`, due `delay` from now.
    pub fn schedule(&mut self, caller: &UserId, user: &UserId) -> Result<(), RosterError> {
        self.authorize(caller, user, "schedule")?;

        if let Some(pending) = self.tasks.get(user)
            && self.collision_policy == CollisionPolicy::Reject
        {
            warn!(%user, due_at = %pending.due_at, "task already pending");
            return Err(RosterError::AlreadyScheduled {
                user: user.clone(),
                due_at: pending.due_at,
            });
        }

        let now = self.clock.now();
        let task = ScheduledTask::new(self.ids.generate_task_id(), user.clone(), now, self.delay);
        let (task_id, due_at) = (task.id, task.due_at);

        // The tick needs an accumulator to credit.
        self.profiles.ensure(user, now);
        let replaced = self.tasks.insert(task).map(|old| old.id);

        info!(%task_id, %user, %due_at, replaced = ?replaced, "task scheduled");
        self.events.emit(&DomainEvent::TaskScheduled {
            task_id,
            user: user.clone(),
            due_at,
            replaced,
        });
        Ok(())
    }

    /// Apply every due task, or fail with `NothingToDo` if none is due.
    ///
    /// Anyone may call this; `caller` is only recorded.
    pub fn tick(&mut self, caller: &UserId) -> Result<TickReport, RosterError> {
        let now = self.clock.now();

        let due = self.tasks.due(now);
        if due.is_empty() {
            debug!(%caller, pending = self.tasks.len(), "tick found nothing due");
            return Err(RosterError::NothingToDo);
        }
        // One task per user, so each user is credited at most once per tick.
        if let Some(task) = due.iter().find(|t| !self.profiles.can_credit(&t.user, self.reward)) {
            warn!(user = %task.user, "credit would overflow, tick rejected");
            return Err(RosterError::CountOverflow {
                user: task.user.clone(),
            });
        }

        let mut applied = Vec::with_capacity(due.len());
        while let Some(task) = self.tasks.pop_due(now) {
            // 上の事前チェックを通っているので、ここで None にはならない
            let Some(count) = self.profiles.credit(&task.user, self.reward, now) else {
                return Err(RosterError::CountOverflow { user: task.user });
            };
            info!(task_id = %task.id, user = %task.user, %count, "task applied");
            self.events.emit(&DomainEvent::TaskApplied {
                task_id: task.id,
                user: task.user.clone(),
                count,
            });
            applied.push(AppliedTask {
                task_id: task.id,
                user: task.user,
                due_at: task.due_at,
                count,
            });
        }

        Ok(TickReport {
            caller: caller.clone(),
            at: now,
            applied,
        })
    }

    /// Zero or one record for `user`.
    pub fn profile(&self, user: &UserId) -> Option<&ProfileRecord> {
        self.profiles.get(user)
    }

    /// The task pending for `user`, if any.
    pub fn pending(&self, user: &UserId) -> Option<&ScheduledTask> {
        self.tasks.get(user)
    }

    /// Whether `user`'s pending task would be applied by a tick right now.
    pub fn task_state(&self, user: &UserId) -> Option<TaskState> {
        let now = self.clock.now();
        self.tasks.get(user).map(|t| TaskState::of(t, now))
    }

    pub fn status(&self) -> QueueStatus {
        let now = self.clock.now();
        QueueStatus {
            at: now,
            profiles: self.profiles.len(),
            pending: self.tasks.len(),
            due: self.tasks.due(now).len(),
            next_due_at: self.tasks.next_due_at(),
        }
    }
}
