//! # 宣言的リクエストバリデーション
//!
//! ルートごとに「path / query / body に何が来るべきか」をデータとして記述し、
//! 受信リクエストをそのスキーマで検証・正規化する小さなルール評価器。
//!
//! ## 構成
//!
//! - [`schema`]: スキーマの定義（[`RequestSchema`] → [`ObjectSchema`] → [`FieldRule`]）
//! - [`evaluator`]: スキーマに対する入力の評価（[`RequestSchema::validate`]）
//!
//! ## 振る舞い
//!
//! - 全フィールドのエラーを収集する（最初の失敗で止めない）
//! - 欠落した任意フィールドにはデフォルト値を補う
//! - スキーマにないキーは出力から取り除く
//! - path / query の値は文字列なので、数値・真偽値フィールドは型変換する
//!
//! ## 使用例
//!
//! ```
//! use pilot_shared::validation::{FieldRule, ObjectSchema, RequestInput, RequestSchema};
//!
//! let schema = RequestSchema::new().body(
//!     ObjectSchema::new()
//!         .field(FieldRule::string("name").min_length(1).max_length(100))
//!         .field(FieldRule::string("priority").one_of(&["low", "high"]).default_value("low")),
//! );
//!
//! let input = RequestInput::with_body(serde_json::json!({ "name": "Item" }));
//! let output = schema.validate(input).unwrap();
//! assert_eq!(output["body"]["priority"], "low");
//!
//! let errors = schema.validate(RequestInput::default()).unwrap_err();
//! assert_eq!(errors.errors()[0].field, "body.name");
//! ```

pub mod evaluator;
pub mod schema;

pub use evaluator::{FieldError, RequestInput, ValidationErrors};
pub use schema::{FieldRule, FieldType, ObjectSchema, RequestSchema, Section};
