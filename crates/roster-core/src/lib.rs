//! roster-core
//!
//! Per-user profile registry with a deferred reward queue.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, profile, task, state, errors, events）
//! - **ports**: 抽象化レイヤー（Clock, Authority, IdGenerator, EventSink）
//! - **store**: インメモリの `profiles` / `tasks` テーブル
//! - **app**: Registry（update / schedule / tick）, builder, ticker, status
//! - **config**: delay, reward, collision policy

pub mod app;
pub mod config;
pub mod domain;
pub mod ports;
pub mod store;

pub use app::{Registry, RegistryBuilder, TickReport};
pub use config::{CollisionPolicy, RosterConfig};
pub use domain::{Credits, ProfileFields, ProfileRecord, RosterError, ScheduledTask, UserId};
