//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 値オブジェクトの不変条件違反 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//!
//! HTTP ステータスへの変換は api クレートが行う。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    #[error("{0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// `entity_type` にはエンティティの種類（"Item" など）を指定する。
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id:          String,
    },
}
