//! # ヘルスチェックハンドラ
//!
//! - `/health`: Liveness Check（常に `"ok"` を返す）
//! - `/health/ready`: Readiness Check（データベースへの疎通を制限時間付きで確認する）
//!
//! レスポンス型は [`pilot_shared::HealthResponse`] / [`pilot_shared::ReadinessResponse`] を参照。

use std::{collections::BTreeMap, sync::Arc, time::Instant};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use pilot_infra::{ReadinessProbe, check_within};
use pilot_shared::{
    HealthResponse,
    ReadinessResponse,
    ServiceStatus,
    timestamp::now_iso_string,
};

use crate::config::Settings;

/// ヘルスチェック API の共有状態
pub struct HealthState {
    pub settings:   Arc<Settings>,
    pub probe:      Arc<dyn ReadinessProbe>,
    /// uptime の起点
    pub started_at: Instant,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        now_iso_string(),
        state.started_at.elapsed().as_secs_f64(),
        state.settings.environment.as_ref(),
    ))
}

/// GET /health/ready
///
/// 成功 → 200 `ready`、失敗またはタイムアウト → 503 `not ready`（`error` に理由）。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let service = state.probe.service_name();

    let (service_status, error) =
        match check_within(state.probe.as_ref(), state.settings.readiness_timeout).await {
            Ok(()) => (ServiceStatus::Connected, None),
            Err(e) => {
                tracing::warn!(service, error = %e, "readiness check failed");
                (ServiceStatus::Disconnected, Some(e.to_string()))
            }
        };

    let services = BTreeMap::from([(service.to_string(), service_status)]);
    let response = ReadinessResponse::from_services(services, error, now_iso_string());
    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}
