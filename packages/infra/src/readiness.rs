//! # Readiness Probe
//!
//! 依存サービスが今リクエストを処理できる状態かを確認する。
//!
//! プローブは [`check_within`] で制限時間付きで実行する。制限時間を超えた場合は
//! [`InfraErrorKind::Timeout`](crate::InfraErrorKind::Timeout) として失敗扱いにする。

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::InfraError;

/// 依存サービスの疎通確認
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// レスポンスの `services` に使う名前（例: `"database"`）
    fn service_name(&self) -> &'static str;

    /// 疎通確認を 1 回行う
    async fn check(&self) -> Result<(), InfraError>;
}

/// PostgreSQL に `SELECT 1` を送る Probe
///
/// 接続はプールから借り、クエリ完了と同時に返却される。
pub struct PostgresReadinessProbe {
    pool: PgPool,
}

impl PostgresReadinessProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessProbe for PostgresReadinessProbe {
    fn service_name(&self) -> &'static str {
        "database"
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn check(&self) -> Result<(), InfraError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// 制限時間付きで Probe を実行する
pub async fn check_within(probe: &dyn ReadinessProbe, timeout: Duration) -> Result<(), InfraError> {
    match tokio::time::timeout(timeout, probe.check()).await {
        Ok(result) => result,
        Err(_) => Err(InfraError::timeout("readiness check", timeout)),
    }
}
