use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::Item;

/// Repository trait for Item persistence
///
/// This trait defines the data access interface for items.
/// Implementations can use different storage backends (MongoDB, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a new item
    async fn insert(&self, item: Item) -> ItemResult<Item>;

    /// Get an item by ID
    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>>;

    /// List all items, newest first
    async fn list(&self) -> ItemResult<Vec<Item>>;

    /// Replace an existing item with an updated document
    async fn replace(&self, item: Item) -> ItemResult<Item>;

    /// Delete an item by ID
    async fn delete(&self, id: Uuid) -> ItemResult<bool>;
}
