//! # ヘルスチェック共通型
//!
//! Liveness（`/health`）と Readiness（`/health/ready`）のレスポンス型を提供する。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Liveness Check レスポンス
///
/// ## 使用例
///
/// ```
/// use pilot_shared::HealthResponse;
///
/// let response = HealthResponse::ok("2026-01-01T00:00:00.000Z", 1.5, "development");
/// assert_eq!(response.status, "ok");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 常に `"ok"`
    pub status:      String,
    pub timestamp:   String,
    /// プロセス起動からの経過秒数
    pub uptime:      f64,
    /// 実行環境名（`development` / `test` / `production`）
    pub environment: String,
}

impl HealthResponse {
    pub fn ok(timestamp: impl Into<String>, uptime: f64, environment: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: timestamp.into(),
            uptime,
            environment: environment.into(),
        }
    }
}

/// 依存サービスごとの接続状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Connected,
    Disconnected,
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessStatus {
    /// 全依存サービスが利用可能
    #[serde(rename = "ready")]
    Ready,
    /// 一部の依存サービスが利用不可
    #[serde(rename = "not ready")]
    NotReady,
}

/// Readiness Check レスポンス
///
/// `services` はサービス名 → 接続状態。失敗時のみ `error` に理由が入る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status:    ReadinessStatus,
    pub services:  BTreeMap<String, ServiceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:     Option<String>,
    pub timestamp: String,
}

impl ReadinessResponse {
    /// 個別チェック結果から全体のステータスを組み立てる
    ///
    /// 1 つでも `Disconnected` があれば `NotReady`。
    pub fn from_services(
        services: BTreeMap<String, ServiceStatus>,
        error: Option<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        let all_connected = services
            .values()
            .all(|s| matches!(s, ServiceStatus::Connected));
        let status = if all_connected {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };

        Self {
            status,
            services,
            error,
            timestamp: timestamp.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}
