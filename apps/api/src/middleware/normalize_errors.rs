//! # エラー正規化ミドルウェア
//!
//! 検証・ハンドラ・パニック捕捉のどこで発生したエラーも、このステージで最終形にする。
//!
//! 1. リクエストボディを上限まで読み込む（超過時は 413、読み込み失敗時は 400）
//! 2. 内側のサービスを呼ぶ
//! 3. レスポンスに [`ErrorReport`] が付いていれば取り出し、
//!    - 本番以外: メッセージ・stack・ステータス・メソッド・URL・ボディを ERROR で記録し、
//!      `stack` 付きのエンベロープに差し替える
//!    - 本番: 5xx のみ記録し、レスポンスは安全な形（`stack` なし）のまま返す
//!
//! ログ出力は失敗せず、レスポンスを待たせない。

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;

use crate::{
    config::Settings,
    error::{AppError, ErrorReport},
};

/// ボディ上限超過時のメッセージ
const PAYLOAD_TOO_LARGE_MESSAGE: &str = "request entity too large";

/// ログに載せるリクエスト情報
struct RequestSummary {
    method: Method,
    uri:    Uri,
    body:   Bytes,
}

/// エラーレスポンスを正規化する
pub async fn normalize_errors(
    State(settings): State<Arc<Settings>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let mut summary = RequestSummary {
        method: parts.method.clone(),
        uri:    parts.uri.clone(),
        body:   Bytes::new(),
    };

    let response = match axum::body::to_bytes(body, settings.body_limit).await {
        Ok(bytes) => {
            summary.body = bytes.clone();
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        Err(err) => body_read_error(err).into_response(),
    };

    finalize(&settings, &summary, response)
}

fn body_read_error(err: axum::Error) -> AppError {
    let source = err.into_inner();
    if source.is::<LengthLimitError>() {
        AppError::operational(StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE_MESSAGE)
    } else {
        AppError::bad_request(format!("failed to read request body: {source}"))
    }
}

fn finalize(settings: &Settings, summary: &RequestSummary, mut response: Response) -> Response {
    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    if !settings.exposes_error_details() {
        if report.status.is_server_error() {
            tracing::error!(
                http.status_code = report.status.as_u16(),
                http.method = %summary.method,
                http.url = %summary.uri,
                error.message = %report.message,
                "リクエスト処理中にエラーが発生しました"
            );
        }
        return response;
    }

    tracing::error!(
        http.status_code = report.status.as_u16(),
        http.method = %summary.method,
        http.url = %summary.uri,
        http.body = %String::from_utf8_lossy(&summary.body),
        error.message = %report.message,
        error.stack = %report.stack,
        "リクエスト処理中にエラーが発生しました"
    );

    report.into_detailed_response()
}
