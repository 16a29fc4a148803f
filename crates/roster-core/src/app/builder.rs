//! RegistryBuilder - Registry の構築とワイヤリング
//!
//! 設定は `build()` で検証する（Fail-fast）。不正な delay / reward は
//! 最初の `schedule` ではなく起動時にエラーになる。

use std::sync::Arc;

use chrono::Duration;

use super::registry::Registry;
use crate::config::RosterConfig;
use crate::domain::Credits;
use crate::ports::{
    Authority, Clock, EventSink, OwnerAuthority, SystemClock, TracingEventSink, UlidGenerator,
};
use crate::store::{ProfileStore, TaskQueue};

/// RegistryBuilder は Registry を構築
///
/// デフォルト: [`RosterConfig::default`], [`SystemClock`], [`OwnerAuthority`],
/// [`TracingEventSink`]
///
/// # 使用例
/// ```ignore
/// let registry = RegistryBuilder::new()
///     .config(RosterConfig::load("roster.toml")?)
///     .clock(ManualClock::new(start))
///     .build()?;
/// ```
pub struct RegistryBuilder {
    config: RosterConfig,
    clock: Arc<dyn Clock>,
    authority: Arc<dyn Authority>,
    events: Arc<dyn EventSink>,
}

/// BuildError は構築時の設定エラー
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("delay_secs must be greater than zero")]
    ZeroDelay,

    #[error("delay_secs={0} is too large to represent")]
    DelayOutOfRange(u64),

    #[error("worker_reward must be greater than zero")]
    ZeroReward,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            config: RosterConfig::default(),
            clock: Arc::new(SystemClock),
            authority: Arc::new(OwnerAuthority),
            events: Arc::new(TracingEventSink),
        }
    }

    pub fn config(mut self, config: RosterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn authority(mut self, authority: impl Authority + 'static) -> Self {
        self.authority = Arc::new(authority);
        self
    }

    pub fn event_sink(mut self, events: impl EventSink + 'static) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn build(self) -> Result<Registry, BuildError> {
        let delay = match self.config.delay_secs {
            0 => return Err(BuildError::ZeroDelay),
            secs => i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .ok_or(BuildError::DelayOutOfRange(secs))?,
        };
        if self.config.worker_reward == 0 {
            return Err(BuildError::ZeroReward);
        }

        Ok(Registry {
            profiles: ProfileStore::new(),
            tasks: TaskQueue::new(),
            delay,
            reward: Credits::new(self.config.worker_reward),
            collision_policy: self.config.collision_policy,
            ids: Box::new(UlidGenerator::new(Arc::clone(&self.clock))),
            clock: self.clock,
            authority: self.authority,
            events: self.events,
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
