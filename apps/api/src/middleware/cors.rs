//! # CORS 設定
//!
//! 設定されたオリジンからのクロスオリジンリクエストを資格情報付きで許可する。
//!
//! - `CORS_ORIGIN=*` のときはリクエストの `Origin` をそのまま返す
//!   （資格情報付きでは `*` を返せないため）
//! - 許可ヘッダーはプリフライトで要求されたものをそのまま返す

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// 設定値から CORS レイヤーを構築する
///
/// オリジンがヘッダー値として不正な場合は警告を出し、クロスオリジンを許可しない。
pub fn build_cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::mirror_request()
    } else {
        match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "CORS_ORIGIN が不正なためクロスオリジンを許可しません");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
}
