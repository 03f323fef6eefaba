//! # PostgreSQL データベース接続管理
//!
//! 接続プールはアプリケーション起動時に一度だけ作成し、全体で共有する。
//!
//! プールは遅延接続（`connect_lazy`）で作成する。起動時にデータベースへ接続できなくても
//! サーバーは立ち上がり、Liveness は応答し、Readiness が `not ready` を返す。

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// 最大接続数
const MAX_CONNECTIONS: u32 = 10;

/// 接続取得のタイムアウト
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL 接続プールを作成する
///
/// 接続 URL の形式が不正な場合のみエラーを返す。実際の接続は最初のクエリ時に行われる。
///
/// # 例
///
/// ```rust,ignore
/// use pilot_infra::db;
///
/// let pool = db::create_pool("postgres://localhost/pilot_db")?;
/// ```
pub fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url)
}
