//! # アイテム
//!
//! API が扱う唯一のリソース。現状は永続化されず、リクエストごとに組み立てられる。
//!
//! | 型 | 内部型 | 説明 |
//! |----|--------|------|
//! | [`ItemId`] | `i64` | 識別子 |
//! | [`ItemName`] | `String` | 名前（1〜100 文字） |
//! | [`Priority`] | enum | 優先度（`low` / `medium` / `high`） |
//! | [`Item`] | struct | エンティティ本体 |

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, VariantNames};

use crate::DomainError;

/// アイテム名の最大文字数
pub const ITEM_NAME_MAX_LENGTH: usize = 100;

// =========================================================================
// ItemId
// =========================================================================

/// アイテム識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ItemId(i64);

impl ItemId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

// =========================================================================
// ItemName
// =========================================================================

/// アイテム名（値オブジェクト）
///
/// # 不変条件
///
/// - 空文字列ではない
/// - 最大 [`ITEM_NAME_MAX_LENGTH`] 文字（Unicode スカラー値単位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct ItemName(String);

impl ItemName {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation("item name must not be empty".to_string()));
        }
        if value.chars().count() > ITEM_NAME_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "item name must be at most {ITEM_NAME_MAX_LENGTH} characters"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

// =========================================================================
// Priority
// =========================================================================

/// 優先度
///
/// `VARIANTS`（`["low", "medium", "high"]`）はリクエストスキーマの列挙値にも使う。
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    VariantNames,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

// =========================================================================
// Item
// =========================================================================

/// 作成リクエストから組み立てる未採番のアイテム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name:        ItemName,
    pub description: Option<String>,
    pub priority:    Priority,
}

/// アイテム（エンティティ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id:          ItemId,
    name:        ItemName,
    description: Option<String>,
    priority:    Priority,
    created_at:  DateTime<Utc>,
}

impl Item {
    /// 採番済みの ID と作成時刻を与えてアイテムを作る
    pub fn new(id: ItemId, new_item: NewItem, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_item.name,
            description: new_item.description,
            priority: new_item.priority,
            created_at,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
