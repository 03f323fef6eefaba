//! # インフラ層エラー定義
//!
//! データベースや外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From` 実装と convenience constructor はエラー生成時点の SpanTrace を捕捉する。

use std::{fmt, time::Duration};

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// 接続失敗、クエリ実行失敗、接続取得タイムアウトなど。
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// 処理が制限時間内に終わらなかった
    #[error("{operation} timed out after {}ms", .timeout.as_millis())]
    Timeout {
        operation: &'static str,
        timeout:   Duration,
    },

    /// 予期しないエラー
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// タイムアウトエラーを生成する
    pub fn timeout(operation: &'static str, timeout: Duration) -> Self {
        Self {
            kind:       InfraErrorKind::Timeout { operation, timeout },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_from_sqlx_errorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("readiness_probe");
            let _enter = span.enter();

            let err: InfraError = sqlx::Error::PoolTimedOut.into();

            assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("readiness_probe"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_databaseエラーはsourceを辿れる() {
        let err: InfraError = sqlx::Error::PoolTimedOut.into();

        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("database error: "));
    }

    #[test]
    fn test_timeoutのメッセージにミリ秒を含む() {
        let err = InfraError::timeout("readiness check", Duration::from_millis(250));

        assert_eq!(err.to_string(), "readiness check timed out after 250ms");
    }

    #[test]
    fn test_unexpectedのメッセージ() {
        let err = InfraError::unexpected("broken");

        assert!(matches!(err.kind(), InfraErrorKind::Unexpected(_)));
        assert_eq!(err.to_string(), "unexpected error: broken");
    }
}
