//! App - アプリケーション層
//!
//! - **Registry**: 2 つのテーブルを所有し、update / schedule / tick を公開
//! - **RegistryBuilder**: config と port のワイヤリング（build 時に検証）
//! - **Ticker**: 一定間隔で tick を呼ぶバックグラウンドの keeper
//! - **QueueStatus**: 読み取り専用のスナップショット

pub mod builder;
pub mod registry;
pub mod status;
pub mod ticker;

pub use self::builder::{BuildError, RegistryBuilder};
pub use self::registry::{AppliedTask, Registry, TickReport};
pub use self::status::QueueStatus;
pub use self::ticker::{SharedRegistry, Ticker, TickerStats};
