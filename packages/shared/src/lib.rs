//! # Pilot 共有ユーティリティ
//!
//! このクレートは、Pilot プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, api）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - Web フレームワーク（axum）には依存しない

pub mod error_response;
pub mod health;
pub mod observability;
pub mod timestamp;
pub mod validation;

pub use error_response::{ErrorBody, ErrorResponse};
pub use health::{HealthResponse, ReadinessResponse, ReadinessStatus, ServiceStatus};
pub use validation::{FieldError, ValidationErrors};
