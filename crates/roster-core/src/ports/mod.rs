//! Ports - ホスト環境との境界
//!
//! Registry は自分で時刻を読んだり、署名を検証したり、出力したりしない。
//! それぞれこの trait を通し、ホスト（またはテスト）が実装を差し込む。
//!
//! - **Clock**: 現在時刻
//! - **Authority**: caller が principal の権限を持つか
//! - **IdGenerator**: タスク ID
//! - **EventSink**: ドメインイベントの出力先

pub mod authority;
pub mod clock;
pub mod event_sink;
pub mod id_generator;

pub use self::authority::{Authority, DelegatedAuthority, OwnerAuthority};
pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::event_sink::{EventSink, MemoryEventSink, NoopEventSink, TracingEventSink};
pub use self::id_generator::{IdGenerator, UlidGenerator};
