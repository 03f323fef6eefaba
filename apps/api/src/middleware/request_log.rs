//! # リクエストログミドルウェア
//!
//! リクエスト完了時に `METHOD URL STATUS DURATIONms` の 1 行ログを INFO で出力する tower Layer。
//!
//! `LOG_LEVEL=debug` のときはクライアント IP・User-Agent・タイムスタンプも
//! 構造化フィールドとして出力する。
//!
//! TraceLayer のスパン内に配置するため、`request_id` は自動的にログに含まれる。

use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::extract::ConnectInfo;
use http::{Request, Response, header};
use pilot_shared::timestamp::now_iso_string;
use tower::{Layer, Service};

use crate::config::LogLevel;

/// リクエストログを出力する Layer
#[derive(Clone, Copy, Debug)]
pub struct RequestLogLayer {
    detailed: bool,
}

impl RequestLogLayer {
    pub fn new(log_level: LogLevel) -> Self {
        Self {
            detailed: log_level == LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService {
            inner,
            detailed: self.detailed,
        }
    }
}

/// [`RequestLogLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct RequestLogService<S> {
    inner:    S,
    detailed: bool,
}

/// debug 時だけ出力する付加情報
struct ClientInfo {
    ip:         String,
    user_agent: String,
}

impl ClientInfo {
    fn from_request<B>(req: &Request<B>) -> Self {
        let ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "-".to_string());
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        Self { ip, user_agent }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // clone-swap パターン: poll_ready で得た readiness を保持する inner を使う
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let method = req.method().clone();
        let url = req.uri().to_string();
        let client = self.detailed.then(|| ClientInfo::from_request(&req));
        let start = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match (&result, client) {
                (Ok(response), None) => {
                    let status = response.status().as_u16();
                    tracing::info!("{method} {url} {status} {duration_ms}ms");
                }
                (Ok(response), Some(client)) => {
                    let status = response.status().as_u16();
                    tracing::info!(
                        http.method = %method,
                        http.url = %url,
                        http.status_code = status,
                        http.duration_ms = duration_ms,
                        client.ip = %client.ip,
                        client.user_agent = %client.user_agent,
                        timestamp = %now_iso_string(),
                        "{method} {url} {status} {duration_ms}ms"
                    );
                }
                (Err(err), _) => {
                    tracing::error!(
                        http.duration_ms = duration_ms,
                        error.message = %err,
                        "{method} {url} failed after {duration_ms}ms"
                    );
                }
            }

            result
        })
    }
}
