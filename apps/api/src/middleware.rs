//! # ミドルウェア
//!
//! リクエストパイプラインを構成するミドルウェアを提供する。
//! 組み立て順序は [`pipeline`](crate::pipeline) を参照。

mod cors;
mod normalize_errors;
mod request_log;
mod security_headers;

pub use cors::build_cors_layer;
pub use normalize_errors::normalize_errors;
pub use request_log::{RequestLogLayer, RequestLogService};
pub use security_headers::security_headers;
