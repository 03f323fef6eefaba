//! # リクエストパイプラインのテスト
//!
//! 任意のルーターに [`pilot_api::pipeline::apply`] を適用し、
//! パニック・実行環境ごとのエラー出力・共通ヘッダーを検証する。

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    routing::{get, post},
};
use http::{Request, StatusCode, header};
use pilot_api::{
    config::{Environment, Settings},
    error::AppError,
    pipeline,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use tower::ServiceExt;

async fn boom() -> &'static str {
    panic!("secret internal detail");
}

async fn fail() -> Result<&'static str, AppError> {
    Err(AppError::unexpected(anyhow::anyhow!("db password=hunter2")))
}

async fn conflict() -> Result<&'static str, AppError> {
    Err(AppError::operational(StatusCode::CONFLICT, "already archived"))
}

async fn accept(body: String) -> String {
    body
}

fn test_app(environment: Environment) -> Router {
    let settings = Arc::new(Settings {
        environment,
        body_limit: 64,
        ..Settings::default()
    });
    let router = Router::new()
        .route("/boom", get(boom))
        .route("/fail", get(fail))
        .route("/conflict", get(conflict))
        .route("/accept", post(accept))
        .route("/ok", get(|| async { "ok" }));
    pipeline::apply(router, settings)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ===== 実行環境ごとのエラー出力 =====

#[rstest]
#[case(Environment::Development)]
#[case(Environment::Test)]
#[tokio::test]
async fn test_本番以外では予期しないエラーにstackを含める(#[case] environment: Environment) {
    let response = test_app(environment)
        .oneshot(get_request("/fail"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Internal Server Error");
    let stack = json["error"]["stack"].as_str().unwrap();
    assert!(stack.contains("db password=hunter2"), "{stack}");
}

#[tokio::test]
async fn test_本番では予期しないエラーに内部情報を含めない() {
    let response = test_app(Environment::Production)
        .oneshot(get_request("/fail"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Internal Server Error");
    assert!(json["error"].get("stack").is_none());
    assert!(!json.to_string().contains("hunter2"));
}

#[tokio::test]
async fn test_operationalエラーは指定のステータスとメッセージを返す() {
    let response = test_app(Environment::Production)
        .oneshot(get_request("/conflict"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "already archived");
}

// ===== パニック =====

#[tokio::test]
async fn test_パニックは開発環境でstack付きの500になる() {
    let response = test_app(Environment::Development)
        .oneshot(get_request("/boom"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Internal Server Error");
    let stack = json["error"]["stack"].as_str().unwrap();
    assert!(stack.contains("secret internal detail"), "{stack}");
}

#[tokio::test]
async fn test_パニックは本番で内部情報を含まない500になる() {
    let response = test_app(Environment::Production)
        .oneshot(get_request("/boom"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Internal Server Error");
    assert!(json["error"].get("stack").is_none());
    assert!(!json.to_string().contains("secret internal detail"));
}

// ===== ボディ上限 =====

#[tokio::test]
async fn test_上限を超えるボディは413のエンベロープを返す() {
    let response = test_app(Environment::Production)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/accept")
                .body(Body::from("x".repeat(65)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "request entity too large");
}

#[tokio::test]
async fn test_上限以内のボディはハンドラに届く() {
    let response = test_app(Environment::Production)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/accept")
                .body(Body::from("x".repeat(64)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.len(), 64);
}

// ===== 共通ヘッダー =====

#[tokio::test]
async fn test_レスポンスにx_request_idヘッダーが含まれる() {
    let response = test_app(Environment::Test)
        .oneshot(get_request("/ok"))
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap();
    let uuid = uuid::Uuid::parse_str(request_id)
        .unwrap_or_else(|_| panic!("有効な UUID であること: {request_id}"));
    assert_eq!(uuid.get_version(), Some(uuid::Version::SortRand));
}

#[tokio::test]
async fn test_クライアント提供のx_request_idがそのまま返される() {
    let response = test_app(Environment::Test)
        .oneshot(
            Request::builder()
                .uri("/ok")
                .header("x-request-id", "client-provided-request-id-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["x-request-id"],
        "client-provided-request-id-123"
    );
}

#[tokio::test]
async fn test_エラーレスポンスにもセキュリティヘッダーとcorsヘッダーが付く() {
    let response = test_app(Environment::Production)
        .oneshot(
            Request::builder()
                .uri("/fail")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert!(headers.contains_key("x-request-id"));
}
