//! # アプリケーション構築
//!
//! 依存（リポジトリ・Probe）から State を作り、ルートを定義してパイプラインを適用する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::{sync::Arc, time::Instant};

use axum::{Router, routing::get};
use pilot_infra::{ItemRepository, ReadinessProbe};

use crate::{
    config::Settings,
    error::AppError,
    handler::{
        HealthState,
        ItemState,
        create_item,
        delete_item,
        get_item,
        health_check,
        list_items,
        readiness_check,
    },
    pipeline,
};

/// アプリケーションが外部から受け取る依存
pub struct AppDeps {
    pub item_repository: Arc<dyn ItemRepository>,
    pub readiness_probe: Arc<dyn ReadinessProbe>,
    /// プロセス起動時刻（uptime の起点）
    pub started_at:      Instant,
}

/// ルーターを構築する
pub fn build_app(settings: Arc<Settings>, deps: AppDeps) -> Router {
    let health_state = Arc::new(HealthState {
        settings:   settings.clone(),
        probe:      deps.readiness_probe,
        started_at: deps.started_at,
    });
    let item_state = Arc::new(ItemState {
        repository: deps.item_repository,
    });

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(health_state)
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/{id}", get(get_item).delete(delete_item))
        .with_state(item_state)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed);

    pipeline::apply(router, settings)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Not Found")
}

async fn method_not_allowed() -> AppError {
    AppError::operational(axum::http::StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
