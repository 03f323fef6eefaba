//! # エラーレスポンス（エラーエンベロープ）
//!
//! 全エンドポイントで共通の 4xx / 5xx レスポンス構造体を提供する。
//!
//! ```json
//! {
//!   "error": {
//!     "message": "Validation Error",
//!     "errors": [{ "field": "body.name", "message": "Required" }],
//!     "stack": "..."
//!   },
//!   "timestamp": "2026-01-01T00:00:00.000Z"
//! }
//! ```
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は api クレートの責務（shared に axum 依存を入れない）
//! - `errors` と `stack` は値がある場合のみ出力する
//! - `stack` を付与するかどうかは呼び出し側が実行環境を見て決める

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{timestamp::to_iso_string, validation::FieldError};

/// バリデーション失敗時のメッセージ
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation Error";

/// 予期しないエラー時のメッセージ（内部情報を含めない固定値）
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// エラーエンベロープ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error:     ErrorBody,
    pub timestamp: String,
}

/// エンベロープ内の `error` オブジェクト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors:  Option<Vec<FieldError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack:   Option<String>,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    pub fn new(message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            error:     ErrorBody {
                message: message.into(),
                errors:  None,
                stack:   None,
            },
            timestamp: to_iso_string(at),
        }
    }

    /// 400 Validation Error
    pub fn validation_error(errors: Vec<FieldError>, at: DateTime<Utc>) -> Self {
        Self::new(VALIDATION_ERROR_MESSAGE, at).with_errors(errors)
    }

    /// 500 Internal Server Error
    ///
    /// メッセージは固定値（内部情報を漏らさないため）。
    pub fn internal_error(at: DateTime<Utc>) -> Self {
        Self::new(INTERNAL_ERROR_MESSAGE, at)
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.error.errors = Some(errors);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.error.stack = Some(stack.into());
        self
    }
}
