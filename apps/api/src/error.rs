//! # API エラー定義
//!
//! ハンドラ・エクストラクタ・ミドルウェアで発生するエラーを 3 種類に分類し、
//! 共通のエラーエンベロープ（[`ErrorResponse`]）に変換する。
//!
//! | 種別 | HTTP Status | メッセージ |
//! |------|-------------|------------|
//! | [`AppError::Validation`] | 400 | `Validation Error`（`errors` にフィールドごとの詳細） |
//! | [`AppError::Operational`] | 発生元が指定 | 発生元が指定 |
//! | [`AppError::Unexpected`] | 500 | `Internal Server Error`（内部情報を含めない） |
//!
//! ## 正規化ミドルウェアとの分担
//!
//! `IntoResponse` は常に本番向けの安全な形（`stack` なし）を返し、
//! 同時に [`ErrorReport`] をレスポンスの extensions に載せる。
//! `stack` の付与とエラーログ出力は
//! [`normalize_errors`](crate::middleware::normalize_errors) が設定を見て行う。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use pilot_domain::DomainError;
use pilot_infra::InfraError;
use pilot_shared::{ErrorResponse, ValidationErrors};
use thiserror::Error;
use tracing_error::SpanTrace;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum AppError {
    /// リクエストがスキーマに一致しない
    #[error("Validation Error")]
    Validation(#[from] ValidationErrors),

    /// 発生元がステータスコードとメッセージを指定したエラー
    #[error("{message}")]
    Operational { status: StatusCode, message: String },

    /// 分類されていないエラー
    ///
    /// 生成時点の SpanTrace を保持する。
    #[error("{error}")]
    Unexpected {
        #[source]
        error:      anyhow::Error,
        span_trace: SpanTrace,
    },
}

impl AppError {
    pub fn operational(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Operational {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, message)
    }

    pub fn unexpected(error: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected {
            error:      error.into(),
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Operational { status, .. } => *status,
            Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 診断用のスタック表現
    ///
    /// 1 行目がエラー種別とメッセージ、続いて原因の連鎖、最後に SpanTrace。
    fn stack(&self) -> String {
        let mut lines = Vec::new();
        match self {
            Self::Validation(errors) => {
                lines.push(format!("ValidationError: {self}"));
                for error in errors.errors() {
                    lines.push(format!("    at {}: {}", error.field, error.message));
                }
                push_span_trace(&mut lines, &SpanTrace::capture());
            }
            Self::Operational { status, message } => {
                lines.push(format!("OperationalError [{}]: {message}", status.as_u16()));
                push_span_trace(&mut lines, &SpanTrace::capture());
            }
            Self::Unexpected { error, span_trace } => {
                lines.push(format!("Error: {error}"));
                for cause in error.chain().skip(1) {
                    lines.push(format!("Caused by: {cause}"));
                }
                push_span_trace(&mut lines, span_trace);
            }
        }
        lines.join("\n")
    }
}

fn push_span_trace(lines: &mut Vec<String>, span_trace: &SpanTrace) {
    let rendered = span_trace.to_string();
    if !rendered.trim().is_empty() {
        lines.push("Span trace:".to_string());
        lines.push(rendered);
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::unexpected(error)
    }
}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation(message) => Self::bad_request(message),
            not_found @ DomainError::NotFound { .. } => Self::not_found(not_found.to_string()),
        }
    }
}

impl From<InfraError> for AppError {
    fn from(error: InfraError) -> Self {
        Self::unexpected(error)
    }
}

/// 分類済みエラーの報告
///
/// [`AppError`] のレスポンスに extensions として付与され、
/// 正規化ミドルウェアが取り出して使う。
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status:   StatusCode,
    /// クライアントに返す安全なエンベロープ（`stack` なし）
    pub envelope: ErrorResponse,
    /// ログ用のメッセージ（内部エラーの詳細を含む）
    pub message:  String,
    pub stack:    String,
}

impl ErrorReport {
    /// `stack` を含めたエンベロープでレスポンスを作り直す
    pub fn into_detailed_response(self) -> Response {
        let envelope = self.envelope.with_stack(self.stack);
        (self.status, Json(envelope)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let now = Utc::now();
        let stack = self.stack();
        let message = self.to_string();

        let envelope = match self {
            Self::Validation(errors) => ErrorResponse::validation_error(errors.into_errors(), now),
            Self::Operational { message, .. } => ErrorResponse::new(message, now),
            Self::Unexpected { .. } => ErrorResponse::internal_error(now),
        };

        let report = ErrorReport {
            status,
            envelope: envelope.clone(),
            message,
            stack,
        };

        let mut response = (status, Json(envelope)).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
