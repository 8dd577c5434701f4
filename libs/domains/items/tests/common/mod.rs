//! Shared fixtures for the HTTP-level tests: an in-memory repository and a
//! canned zipcode client, so the full router can be exercised without
//! MongoDB or network access.

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};
use domain_items::{
    Item, ItemError, ItemRepository, ItemResult, ItemService, ZipcodeClient, ZipcodeLocation,
    handlers,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// ItemRepository backed by a HashMap
#[derive(Default)]
pub struct InMemoryItemRepository {
    items: Mutex<HashMap<Uuid, Item>>,
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: Item) -> ItemResult<Item> {
        self.items.lock().unwrap().insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> ItemResult<Vec<Item>> {
        let mut items: Vec<Item> = self.items.lock().unwrap().values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn replace(&self, item: Item) -> ItemResult<Item> {
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&item.id) {
            return Err(ItemError::NotFound(item.id));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        if self.items.lock().unwrap().remove(&id).is_none() {
            return Err(ItemError::NotFound(id));
        }
        Ok(true)
    }
}

/// ZipcodeClient that always resolves to midtown Manhattan
pub struct FixedZipcodeClient;

#[async_trait]
impl ZipcodeClient for FixedZipcodeClient {
    async fn lookup(&self, _postcode: &str) -> Option<ZipcodeLocation> {
        Some(ZipcodeLocation {
            latitude: 40.7484,
            longitude: -73.9967,
            place_name: "New York".to_string(),
            state: "New York".to_string(),
            state_abbreviation: "NY".to_string(),
        })
    }
}

/// Build the items router on top of the in-memory fixtures
pub fn test_router() -> Router {
    let service = ItemService::new(InMemoryItemRepository::default(), FixedZipcodeClient);
    Router::new().nest("/items", handlers::router(service))
}

/// A request body that satisfies every creation rule
pub fn valid_item_body() -> Value {
    let start_date = (Utc::now() + Duration::weeks(1) + Duration::days(1)).to_rfc3339();
    json!({
        "name": "Test Item",
        "postcode": "10001",
        "title": "Test Title",
        "users": ["Test Item", "User Two", "User Three"],
        "startDate": start_date,
    })
}
