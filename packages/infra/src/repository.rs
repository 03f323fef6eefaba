//! # リポジトリ
//!
//! ハンドラが必要とするストレージ操作をトレイトとして定義し、その実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ハンドラはトレイト経由でのみストレージに触れる
//! - **差し替え可能**: 永続化の実装が入るまではスタブ実装を使う

pub mod item_repository;

pub use item_repository::{ItemRepository, StubItemRepository};
