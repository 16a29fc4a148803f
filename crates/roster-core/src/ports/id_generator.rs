//! IdGenerator port - タスク ID 生成の抽象化
//!
//! テストで ManualClock から決定的なタイムスタンプの ID を作れるように、
//! trait として切り出しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（単調増加）

use std::sync::Mutex;
use std::time::SystemTime;

use ulid::{Generator, Ulid};

use crate::domain::TaskId;
use crate::ports::Clock;

/// IdGenerator はタスク ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（Registry ごと別タスクへ渡せる）
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

/// UlidGenerator は Clock の時刻から ULID を生成
///
/// 同じミリ秒内では前回の ID をインクリメントするので、
/// 1 つの生成器から出た ID は常に生成順でソートされる。
pub struct UlidGenerator<C> {
    clock: C,
    generator: Mutex<Generator>,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            generator: Mutex::new(Generator::new()),
        }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        let at = SystemTime::from(self.clock.now());
        let mut generator = self
            .generator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // 乱数部が 1ms 内で尽きた場合のみ Err。単調性は諦めて新しい ULID を使う
        let ulid = generator
            .generate_from_datetime(at)
            .unwrap_or_else(|_| Ulid::from_datetime(at));
        TaskId::from(ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ManualClock, SystemClock};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);
        let a = id_gen.generate_task_id();
        let b = id_gen.generate_task_id();
        assert_ne!(a, b);
    }

    #[test]
    fn timestamp_comes_from_clock() {
        let fixed = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(ManualClock::new(fixed));

        let id = id_gen.generate_task_id();
        assert_eq!(id.as_ulid().timestamp_ms(), fixed.timestamp_millis() as u64);
    }

    #[test]
    fn ids_at_the_same_instant_sort_in_generation_order() {
        let fixed = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(ManualClock::new(fixed));

        let ids: Vec<TaskId> = (0..500).map(|_| id_gen.generate_task_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ids_stay_ordered_across_milliseconds() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let id_gen = UlidGenerator::new(clock.clone());

        let first = id_gen.generate_task_id();
        clock.advance(Duration::milliseconds(1));
        let second = id_gen.generate_task_id();
        assert!(first < second);
        assert_eq!(second.as_ulid().timestamp_ms(), first.as_ulid().timestamp_ms() + 1);
    }
}
