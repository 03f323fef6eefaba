//! # アイテムハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/items` - アイテム一覧
//! - `POST /api/items` - アイテム作成
//! - `GET /api/items/{id}` - アイテム取得
//! - `DELETE /api/items/{id}` - アイテム削除（存在しない ID でも 204）

use std::sync::{Arc, LazyLock};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use pilot_domain::{
    DomainError,
    item::{ITEM_NAME_MAX_LENGTH, Item, ItemId, ItemName, NewItem, Priority},
};
use pilot_infra::ItemRepository;
use pilot_shared::{
    timestamp::to_iso_string,
    validation::{FieldRule, ObjectSchema, RequestSchema},
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

use crate::{
    error::AppError,
    extractor::{Validated, ValidatedRequest},
};

/// アイテム API の共有状態
pub struct ItemState {
    pub repository: Arc<dyn ItemRepository>,
}

// --- スキーマ ---

static CREATE_ITEM_SCHEMA: LazyLock<RequestSchema> = LazyLock::new(|| {
    RequestSchema::new().body(
        ObjectSchema::new()
            .field(
                FieldRule::string("name")
                    .min_length(1)
                    .max_length(ITEM_NAME_MAX_LENGTH),
            )
            .field(FieldRule::string("description").optional())
            .field(
                FieldRule::string("priority")
                    .one_of(Priority::VARIANTS)
                    .default_value(Priority::default().as_ref()),
            ),
    )
});

static ITEM_PATH_SCHEMA: LazyLock<RequestSchema> = LazyLock::new(|| {
    RequestSchema::new().path(ObjectSchema::new().field(FieldRule::integer("id")))
});

// --- リクエスト/レスポンス型 ---

/// アイテム作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub body: CreateItemBody,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemBody {
    pub name:        ItemName,
    #[serde(default)]
    pub description: Option<String>,
    pub priority:    Priority,
}

impl ValidatedRequest for CreateItemRequest {
    fn schema() -> &'static RequestSchema {
        &CREATE_ITEM_SCHEMA
    }
}

/// `/api/items/{id}` のリクエスト
#[derive(Debug, Deserialize)]
pub struct ItemPathRequest {
    pub path: ItemPath,
}

#[derive(Debug, Deserialize)]
pub struct ItemPath {
    pub id: i64,
}

impl ValidatedRequest for ItemPathRequest {
    fn schema() -> &'static RequestSchema {
        &ITEM_PATH_SCHEMA
    }
}

/// アイテム DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id:          i64,
    pub name:        String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority:    Priority,
    pub created_at:  String,
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        Self {
            id:          item.id().as_i64(),
            name:        item.name().to_string(),
            description: item.description().map(str::to_string),
            priority:    item.priority(),
            created_at:  to_iso_string(item.created_at()),
        }
    }
}

/// アイテム一覧レスポンス
#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<ItemDto>,
    pub total: usize,
}

// --- ハンドラ ---

/// GET /api/items
pub async fn list_items(
    State(state): State<Arc<ItemState>>,
) -> Result<impl IntoResponse, AppError> {
    let items: Vec<ItemDto> = state
        .repository
        .list()
        .await?
        .iter()
        .map(ItemDto::from)
        .collect();
    let total = items.len();

    Ok(Json(ItemListResponse { items, total }))
}

/// POST /api/items
///
/// 送信された値をそのまま持つアイテムを採番して 201 で返す。
pub async fn create_item(
    State(state): State<Arc<ItemState>>,
    Validated(req): Validated<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let CreateItemBody {
        name,
        description,
        priority,
    } = req.body;

    let item = state
        .repository
        .insert(NewItem {
            name,
            description,
            priority,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ItemDto::from(&item))))
}

/// GET /api/items/{id}
pub async fn get_item(
    State(state): State<Arc<ItemState>>,
    Validated(req): Validated<ItemPathRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = ItemId::new(req.path.id);

    let item = state
        .repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound {
            entity_type: "Item",
            id:          id.to_string(),
        })?;

    Ok(Json(ItemDto::from(&item)))
}

/// DELETE /api/items/{id}
pub async fn delete_item(
    State(state): State<Arc<ItemState>>,
    Validated(req): Validated<ItemPathRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.repository.delete(ItemId::new(req.path.id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
