//! # 検証済みリクエストエクストラクタ
//!
//! [`Validated<T>`] はリクエストの path / query / body を `T` のスキーマで検証し、
//! 型変換・デフォルト補完済みの値を `T` として取り出す。
//!
//! 検証に失敗した場合は [`AppError`] で拒否するため、ハンドラは呼ばれない。
//!
//! ## 入力の組み立て
//!
//! - path: ルートのパスパラメータ（文字列）
//! - query: クエリ文字列（文字列。同名キーは後勝ち）
//! - body: `Content-Type` が JSON のときだけ JSON として読む。空ボディとそれ以外は `{}`
//!
//! 不正な JSON はバリデーションエラーではなく 400 の operational エラーになる。

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, FromRequestParts, Query, RawPathParams, Request},
    http::{HeaderMap, header},
};
use bytes::Bytes;
use pilot_shared::validation::{RequestInput, RequestSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// スキーマを持つリクエスト型
///
/// デシリアライズ先は `{ "path": ..., "query": ..., "body": ... }` のうち
/// スキーマが定義したセクションだけを含む。
pub trait ValidatedRequest: DeserializeOwned {
    /// このリクエストのスキーマ（起動後に一度だけ構築されたもの）
    fn schema() -> &'static RequestSchema;
}

/// スキーマ検証済みのリクエスト
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedRequest + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let path = RawPathParams::from_request_parts(&mut parts, state)
            .await
            .map_err(|rejection| AppError::operational(rejection.status(), rejection.body_text()))?
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();

        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|rejection| AppError::operational(rejection.status(), rejection.body_text()))?;
        let query = query
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        let is_json = is_json_content_type(&parts.headers);
        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|rejection| AppError::operational(rejection.status(), rejection.body_text()))?;
        let body = parse_body(is_json, &bytes)?;

        let input = RequestInput { path, query, body };
        let normalized = T::schema().validate(input)?;

        let value = serde_json::from_value(normalized).map_err(|e| {
            AppError::unexpected(
                anyhow::Error::new(e).context("検証済みの値をリクエスト型に変換できません"),
            )
        })?;

        Ok(Self(value))
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn parse_body(is_json: bool, bytes: &[u8]) -> Result<Value, AppError> {
    if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))
}
