//! # Pilot ドメイン層
//!
//! エンティティ・値オブジェクト・ドメインエラーを定義する。
//! 永続化や HTTP には依存しない。

pub mod clock;
pub mod error;
pub mod item;

pub use error::DomainError;
