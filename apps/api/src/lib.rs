//! # Pilot API サーバー
//!
//! アイテム API とヘルスチェックを提供する HTTP サーバー。
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義とエラーエンベロープへの変換
//! - [`extractor`] - スキーマ検証付きエクストラクタ
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - パイプラインを構成するミドルウェア
//! - [`pipeline`] - ミドルウェアの組み立て
//! - [`app`] - State とルートの構築
//!
//! ## 依存関係
//!
//! - `pilot_domain`: エンティティ、ドメインエラー
//! - `pilot_infra`: データベース接続、リポジトリ、Readiness Probe
//! - `pilot_shared`: エラーエンベロープ、バリデーション、トレーシング初期化
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use pilot_api::{app::{AppDeps, build_app}, config::Settings};
//!
//! let settings = Arc::new(Settings::from_env()?);
//! let app = build_app(settings, deps);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod middleware;
pub mod pipeline;
