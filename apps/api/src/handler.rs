//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは自分でエラーレスポンスを組み立てない（[`AppError`](crate::error::AppError) を返すだけ）

pub mod health;
pub mod item;

pub use health::{HealthState, health_check, readiness_check};
pub use item::{ItemState, create_item, delete_item, get_item, list_items};
