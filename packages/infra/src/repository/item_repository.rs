//! # ItemRepository
//!
//! アイテムの一覧・取得・作成・削除を担当するリポジトリ。
//!
//! 現状の実装は [`StubItemRepository`] のみで、何も保存しない。
//! 一覧と取得は固定のサンプルを返し、作成は入力をそのまま採番して返し、削除は何もしない。

use std::sync::Arc;

use async_trait::async_trait;
use pilot_domain::{
    clock::Clock,
    item::{Item, ItemId, ItemName, NewItem, Priority},
};

use crate::error::InfraError;

/// アイテムリポジトリトレイト
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// 全アイテムを取得
    async fn list(&self) -> Result<Vec<Item>, InfraError>;

    /// ID でアイテムを検索
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError>;

    /// アイテムを作成し、採番済みのアイテムを返す
    async fn insert(&self, new_item: NewItem) -> Result<Item, InfraError>;

    /// アイテムを削除
    ///
    /// 存在しない ID でもエラーにしない。
    async fn delete(&self, id: ItemId) -> Result<(), InfraError>;
}

/// 保存を行わないスタブ実装
///
/// 時刻は [`Clock`] から取得するため、テストでは固定できる。
pub struct StubItemRepository {
    clock: Arc<dyn Clock>,
}

impl StubItemRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    fn sample(
        &self,
        id: ItemId,
        description: Option<&str>,
        priority: Priority,
    ) -> Result<Item, InfraError> {
        let name = ItemName::new("Sample Item").map_err(|e| InfraError::unexpected(e.to_string()))?;
        let new_item = NewItem {
            name,
            description: description.map(str::to_string),
            priority,
        };
        Ok(Item::new(id, new_item, self.clock.now()))
    }
}

#[async_trait]
impl ItemRepository for StubItemRepository {
    async fn list(&self) -> Result<Vec<Item>, InfraError> {
        let item = self.sample(ItemId::new(1), None, Priority::High)?;
        Ok(vec![item])
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError> {
        let item = self.sample(id, Some("This is a sample item"), Priority::Medium)?;
        Ok(Some(item))
    }

    async fn insert(&self, new_item: NewItem) -> Result<Item, InfraError> {
        let (id, created_at) = self.clock.stamp_new_item();
        tracing::debug!(item_id = %id, "アイテムを採番しました");
        Ok(Item::new(id, new_item, created_at))
    }

    async fn delete(&self, id: ItemId) -> Result<(), InfraError> {
        tracing::debug!(item_id = %id, "削除対象のアイテムはありません");
        Ok(())
    }
}
