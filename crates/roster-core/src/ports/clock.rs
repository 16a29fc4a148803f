//! Clock port - 時刻の抽象化
//!
//! Registry が必要とするのは「現在時刻」だけ。どこから取るかはホスト次第。
//! どの実装も時刻を巻き戻してはいけない。
//!
//! # 実装
//! - **SystemClock**: 本番用（`Utc::now()`）
//! - **ManualClock**: テスト・スクリプト再生用

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Clock は現在時刻を提供
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// 壁時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 手動で進める時計
///
/// clone 同士は同じ時刻を共有する。テストはハンドルを 1 つ手元に残し、
/// Registry が持つ clone の下で時刻を進められる。
///
/// # 例
/// ```ignore
/// let clock = ManualClock::new(start);
/// let registry = Registry::builder().clock(clock.clone()).build()?;
/// clock.advance(Duration::seconds(10));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// 時刻を進める
    ///
    /// - 負の値は無視
    /// - 表現できる最大時刻（`DateTime::<Utc>::MAX_UTC`）で飽和
    pub fn advance(&self, by: Duration) -> DateTime<Utc> {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if by > Duration::zero() {
            *now = now.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC);
        }
        *now
    }

    /// `t` へジャンプ。`t` が過去なら何もしない
    pub fn set(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if t > *now {
            *now = t;
        }
        *now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(t0());
        let handle = clock.clone();
        handle.advance(Duration::seconds(10));
        assert_eq!(clock.now(), t0() + Duration::seconds(10));
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualClock::new(t0());
        clock.advance(Duration::seconds(-5));
        assert_eq!(clock.now(), t0());

        clock.set(t0() - Duration::hours(1));
        assert_eq!(clock.now(), t0());

        clock.set(t0() + Duration::hours(1));
        assert_eq!(clock.now(), t0() + Duration::hours(1));
    }

    #[test]
    fn advance_saturates_at_max_utc() {
        let clock = ManualClock::new(t0());
        let huge = Duration::try_seconds(9_000_000_000_000).unwrap();

        assert_eq!(clock.advance(huge), DateTime::<Utc>::MAX_UTC);
        assert_eq!(clock.advance(Duration::seconds(1)), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn arc_dyn_clock_delegates() {
        let manual = ManualClock::new(t0());
        let shared: Arc<dyn Clock> = Arc::new(manual.clone());
        manual.advance(Duration::seconds(3));
        assert_eq!(shared.now(), t0() + Duration::seconds(3));
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
