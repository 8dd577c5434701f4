//! MongoDB implementation of ItemRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::Item;
use crate::repository::ItemRepository;

/// MongoDB implementation of the ItemRepository
pub struct MongoItemRepository {
    collection: Collection<Item>,
}

impl MongoItemRepository {
    /// Create a new MongoItemRepository
    ///
    /// # Arguments
    /// * `db` - MongoDB database instance
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("mydb");
    /// let repo = MongoItemRepository::new(db);
    /// ```
    pub fn new(db: Database) -> Self {
        let collection = db.collection::<Item>("items");
        Self { collection }
    }

    /// Create a new MongoItemRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Item>(collection_name);
        Self { collection }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Item> {
        &self.collection
    }

    /// Create the secondary indexes the collection is queried by.
    ///
    /// Call once at application startup.
    pub async fn create_indexes(&self) -> ItemResult<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "name": 1 }).build(),
            IndexModel::builder().keys(doc! { "postcode": 1 }).build(),
            IndexModel::builder().keys(doc! { "created_at": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    /// Build the `_id` filter document for a UUID
    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn insert(&self, item: Item) -> ItemResult<Item> {
        self.collection.insert_one(&item).await?;

        tracing::info!(item_id = %item.id, "Item created successfully");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let item = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ItemResult<Vec<Item>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let items: Vec<Item> = cursor.try_collect().await?;

        Ok(items)
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn replace(&self, item: Item) -> ItemResult<Item> {
        let result = self
            .collection
            .replace_one(Self::id_filter(item.id), &item)
            .await?;

        if result.matched_count == 0 {
            return Err(ItemError::NotFound(item.id));
        }

        tracing::info!(item_id = %item.id, "Item updated successfully");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count == 0 {
            return Err(ItemError::NotFound(id));
        }

        tracing::info!(item_id = %id, "Item deleted successfully");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateItem, Direction};
    use chrono::{Duration, Utc};

    fn sample_item() -> Item {
        Item::new(
            CreateItem {
                name: "Sample Item".to_string(),
                postcode: "10001".to_string(),
                title: None,
                users: vec!["Sample Item".to_string()],
                start_date: Utc::now() + Duration::weeks(2),
            },
            40.7484,
            -73.9967,
            Direction::Northeast,
        )
    }

    #[test]
    fn test_id_filter_uses_underscore_id() {
        let id = Uuid::now_v7();
        let filter = MongoItemRepository::id_filter(id);
        assert!(filter.contains_key("_id"));
        assert_ne!(filter.get("_id"), Some(&Bson::Null));
    }

    #[test]
    fn test_item_document_shape() {
        let item = sample_item();
        let document = mongodb::bson::to_document(&item).unwrap();

        // Persisted representation keeps snake_case and the Mongo _id key
        assert!(document.contains_key("_id"));
        assert!(document.contains_key("direction_from_new_york"));
        assert!(document.contains_key("start_date"));
        assert!(!document.contains_key("directionFromNewYork"));
        assert_eq!(
            document.get_str("direction_from_new_york").unwrap(),
            "NE"
        );
    }

    #[test]
    fn test_item_document_round_trip() {
        let item = sample_item();
        let document = mongodb::bson::to_document(&item).unwrap();
        let decoded: Item = mongodb::bson::from_document(document).unwrap();

        assert_eq!(decoded.id, item.id);
        assert_eq!(decoded.name, item.name);
        assert_eq!(decoded.users, item.users);
        assert_eq!(decoded.direction_from_new_york, Direction::Northeast);
    }
}
