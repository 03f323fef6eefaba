//! # リクエストパイプライン
//!
//! ルーターにミドルウェアを決まった順序で積む。
//!
//! ```text
//! SetRequestId → Trace → PropagateRequestId → SecurityHeaders → CORS
//!   → RequestLog → NormalizeErrors → CatchPanic → ルート（Validated → ハンドラ）
//! ```
//!
//! axum の `layer` は後に書いたものほど外側になるため、コード上は逆順に並ぶ。
//! axum 既定のボディ上限（2 MiB）は無効化し、`BODY_LIMIT_BYTES` だけを有効な上限とする。

use std::{any::Any, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
};
use pilot_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::Settings,
    error::AppError,
    middleware::{RequestLogLayer, build_cors_layer, normalize_errors, security_headers},
};

/// ルーターにパイプラインを適用する
pub fn apply(router: Router, settings: Arc<Settings>) -> Router {
    router
        // ボディ上限は NormalizeErrors が BODY_LIMIT_BYTES で一元的に適用する
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(settings.clone(), normalize_errors))
        .layer(RequestLogLayer::new(settings.log_level))
        .layer(build_cors_layer(&settings.cors_origin))
        .layer(from_fn(security_headers))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// ハンドラのパニックを分類前の内部エラーとして扱う
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::unexpected(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
