//! # Clock（アイテムの時刻源）
//!
//! アイテムの `createdAt` と、作成時刻のエポックミリ秒で採番する ID は
//! どちらもこのトレイトから得る。リポジトリに注入するため、
//! テストでは採番結果まで固定できる。

use chrono::{DateTime, Utc};

use crate::item::ItemId;

/// アイテムの時刻源
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// 作成時刻と、その時刻から採番した ID を返す
    ///
    /// 時刻の読み取りは 1 回だけなので、ID と `createdAt` は必ず一致する。
    fn stamp_new_item(&self) -> (ItemId, DateTime<Utc>) {
        let created_at = self.now();
        (ItemId::new(created_at.timestamp_millis()), created_at)
    }
}

/// 稼働中のサーバーで使う実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 常に同じ時刻を返す実装
///
/// 結合テストで `id` と `createdAt` を期待値として書けるようにする。
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
