//! # アイテム API のテスト
//!
//! パイプライン込みのルーターに対してリクエストを送り、
//! 検証・ハンドラ・エラー正規化を通した結果を確認する。

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::{DateTime, TimeZone, Utc};
use http::{Request, StatusCode, header};
use pilot_api::{
    app::{AppDeps, build_app},
    config::{Environment, Settings},
};
use pilot_domain::clock::FixedClock;
use pilot_infra::{InfraError, ReadinessProbe, StubItemRepository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

struct AlwaysReadyProbe;

#[async_trait]
impl ReadinessProbe for AlwaysReadyProbe {
    fn service_name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

const MIB: usize = 1024 * 1024;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn test_app() -> Router {
    test_app_with(Settings {
        environment: Environment::Test,
        ..Settings::default()
    })
}

fn test_app_with(settings: Settings) -> Router {
    let settings = Arc::new(settings);
    let deps = AppDeps {
        item_repository: Arc::new(StubItemRepository::new(Arc::new(FixedClock::new(
            fixed_now(),
        )))),
        readiness_probe: Arc::new(AlwaysReadyProbe),
        started_at:      Instant::now(),
    };
    build_app(settings, deps)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn error_fields(json: &Value) -> Vec<(String, String)> {
    json["error"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["field"].as_str().unwrap().to_string(),
                e["message"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

// ===== POST /api/items =====

#[tokio::test]
async fn test_空のボディはバリデーションエラーになる() {
    let sut = test_app();

    let response = sut.oneshot(post_json("/api/items", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Validation Error");
    assert_eq!(
        error_fields(&json),
        vec![("body.name".to_string(), "Required".to_string())]
    );
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_有効なリクエストは201で送信値を返す() {
    let sut = test_app();

    let response = sut
        .oneshot(post_json(
            "/api/items",
            r#"{"name":"Test Item","description":"Test Description","priority":"high"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "id": fixed_now().timestamp_millis(),
            "name": "Test Item",
            "description": "Test Description",
            "priority": "high",
            "createdAt": "2026-01-01T00:00:00.000Z"
        })
    );
}

#[tokio::test]
async fn test_priority省略時はmediumを補い説明は出力しない() {
    let sut = test_app();

    let response = sut
        .oneshot(post_json("/api/items", r#"{"name":"Test Item"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["priority"], "medium");
    assert!(json.get("description").is_none());
    assert!(json["id"].is_i64());
}

#[tokio::test]
async fn test_スキーマにないキーは無視される() {
    let sut = test_app();

    let response = sut
        .oneshot(post_json(
            "/api/items",
            r#"{"name":"Test Item","owner":"someone"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json.get("owner").is_none());
}

#[rstest]
#[case(r#"{"name":""}"#, "body.name", "String must contain at least 1 character(s)")]
#[case(
    &format!(r#"{{"name":"{}"}}"#, "x".repeat(101)),
    "body.name",
    "String must contain at most 100 character(s)"
)]
#[case(r#"{"name":123}"#, "body.name", "Expected string, received number")]
#[case(r#"{"name":null}"#, "body.name", "Expected string, received null")]
#[case(
    r#"{"name":"a","priority":"urgent"}"#,
    "body.priority",
    "Invalid enum value. Expected 'low' | 'medium' | 'high', received 'urgent'"
)]
#[case(
    r#"{"name":"a","description":false}"#,
    "body.description",
    "Expected string, received boolean"
)]
#[case(r#"[]"#, "body", "Expected object, received array")]
#[tokio::test]
async fn test_不正な値はフィールドごとのエラーになる(
    #[case] body: &str,
    #[case] field: &str,
    #[case] message: &str,
) {
    let sut = test_app();

    let response = sut.oneshot(post_json("/api/items", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        error_fields(&json),
        vec![(field.to_string(), message.to_string())]
    );
}

#[tokio::test]
async fn test_複数フィールドのエラーをまとめて返す() {
    let sut = test_app();

    let response = sut
        .oneshot(post_json(
            "/api/items",
            r#"{"name":"","priority":"urgent"}"#,
        ))
        .await
        .unwrap();

    let json = body_json(response).await;
    let fields: Vec<String> = error_fields(&json).into_iter().map(|(f, _)| f).collect();
    assert_eq!(fields, vec!["body.name", "body.priority"]);
}

#[tokio::test]
async fn test_不正なjsonは400のエンベロープを返す() {
    let sut = test_app();

    let response = sut
        .oneshot(post_json("/api/items", r#"{"name":"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Invalid JSON body: "), "{message}");
    assert!(json["error"].get("errors").is_none());
}

#[rstest]
#[case(3 * MIB, StatusCode::CREATED)]
#[case(5 * MIB, StatusCode::PAYLOAD_TOO_LARGE)]
#[tokio::test]
async fn test_2mibを超える上限を設定するとその値までボディを受け付ける(
    #[case] description_len: usize,
    #[case] expected: StatusCode,
) {
    let sut = test_app_with(Settings {
        environment: Environment::Test,
        body_limit: 4 * MIB,
        ..Settings::default()
    });
    let body = json!({ "name": "Large Item", "description": "x".repeat(description_len) });

    let response = sut
        .oneshot(post_json("/api/items", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), expected);
    let json = body_json(response).await;
    if expected == StatusCode::CREATED {
        assert_eq!(json["description"].as_str().unwrap().len(), description_len);
    } else {
        assert_eq!(json["error"]["message"], "request entity too large");
    }
}

// ===== GET /api/items =====

#[tokio::test]
async fn test_一覧はサンプルを1件返す() {
    let sut = test_app();

    let response = sut.oneshot(request("GET", "/api/items")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["id"], 1);
    assert_eq!(json["items"][0]["name"], "Sample Item");
    assert_eq!(json["items"][0]["priority"], "high");
}

// ===== GET /api/items/{id} =====

#[tokio::test]
async fn test_取得は指定idのアイテムを返す() {
    let sut = test_app();

    let response = sut.oneshot(request("GET", "/api/items/42")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 42);
    assert_eq!(json["name"], "Sample Item");
    assert_eq!(json["description"], "This is a sample item");
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["createdAt"], "2026-01-01T00:00:00.000Z");
}

#[rstest]
#[case("/api/items/abc", "Expected number, received nan")]
#[case("/api/items/1.5", "Expected integer, received float")]
#[tokio::test]
async fn test_整数でないidはバリデーションエラーになる(#[case] uri: &str, #[case] message: &str) {
    let sut = test_app();

    let response = sut.oneshot(request("GET", uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        error_fields(&json),
        vec![("path.id".to_string(), message.to_string())]
    );
}

// ===== DELETE /api/items/{id} =====

#[rstest]
#[case("/api/items/1")]
#[case("/api/items/999999")]
#[tokio::test]
async fn test_削除はidに関わらず204で空ボディを返す(#[case] uri: &str) {
    let sut = test_app();

    let response = sut.oneshot(request("DELETE", uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_削除でも整数でないidは400を返す() {
    let sut = test_app();

    let response = sut.oneshot(request("DELETE", "/api/items/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ===== ルーティング =====

#[tokio::test]
async fn test_未定義のルートは404のエンベロープを返す() {
    let sut = test_app();

    let response = sut.oneshot(request("GET", "/api/unknown")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Not Found");
}

#[tokio::test]
async fn test_未対応のメソッドは405のエンベロープを返す() {
    let sut = test_app();

    let response = sut.oneshot(request("PUT", "/api/items")).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Method Not Allowed");
}
