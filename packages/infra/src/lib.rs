//! # Pilot インフラ層
//!
//! 外部システム（PostgreSQL）との接続と、ドメインが必要とするストレージ操作を提供する。
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//!   ↘          ↗
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プール管理
//! - [`readiness`] - 依存サービスの疎通確認
//! - [`repository`] - アイテムのストレージ操作
//! - [`error`] - インフラ層エラー定義

pub mod db;
pub mod error;
pub mod readiness;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
pub use readiness::{PostgresReadinessProbe, ReadinessProbe, check_within};
pub use repository::{ItemRepository, StubItemRepository};
