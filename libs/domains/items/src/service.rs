//! Item Service - Business logic layer

use event_bus::EventBus;
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::events::{ITEM_CREATED, ITEM_DELETED, ITEM_UPDATED};
use crate::geo::{ZipcodeClient, direction_from_new_york};
use crate::models::{CreateItem, Item, UpdateItem};
use crate::repository::ItemRepository;

/// Item service providing business logic operations
///
/// The service layer handles validation, geo enrichment, business rules,
/// and orchestrates repository operations. Each successful mutation emits
/// an event on the configured bus.
pub struct ItemService<R: ItemRepository, Z: ZipcodeClient> {
    repository: Arc<R>,
    zipcodes: Arc<Z>,
    events: Option<EventBus>,
}

impl<R: ItemRepository, Z: ZipcodeClient> ItemService<R, Z> {
    /// Create a new ItemService with the given repository and zipcode client
    pub fn new(repository: R, zipcodes: Z) -> Self {
        Self {
            repository: Arc::new(repository),
            zipcodes: Arc::new(zipcodes),
            events: None,
        }
    }

    /// Attach an event bus; mutations will publish to it
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, name: &str, payload: serde_json::Value) {
        if let Some(bus) = &self.events {
            bus.emit(name, payload);
        }
    }

    /// Create a new item
    ///
    /// Resolves the postcode to coordinates and derives the direction from
    /// New York before persisting.
    #[instrument(skip(self, input), fields(item_name = %input.name))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        input.validate()?;

        let location = self
            .zipcodes
            .lookup(&input.postcode)
            .await
            .ok_or_else(|| ItemError::UnknownPostcode(input.postcode.clone()))?;

        let direction = direction_from_new_york(location.latitude, location.longitude);
        let item = Item::new(input, location.latitude, location.longitude, direction);

        let item = self.repository.insert(item).await?;

        self.emit(ITEM_CREATED, json!({ "item_id": item.id, "item": &item }));

        Ok(item)
    }

    /// Get an item by ID
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: Uuid) -> ItemResult<Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    /// List all items
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ItemResult<Vec<Item>> {
        self.repository.list().await
    }

    /// Update an existing item
    ///
    /// Performs a partial merge of the provided fields. The name-in-users
    /// invariant is enforced against the merged state, so updating either
    /// side alone is checked against the stored value of the other.
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item> {
        input.validate()?;

        if input.is_empty() {
            return Err(ItemError::rule("_", "No updatable fields provided"));
        }

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        let name = input.name.as_ref().unwrap_or(&existing.name);
        let users = input.users.as_ref().unwrap_or(&existing.users);
        if !users.contains(name) {
            return Err(ItemError::rule(
                "name",
                "Name must be included in the users list",
            ));
        }

        let mut updated = existing;
        updated.apply_update(input);

        let updated = self.repository.replace(updated).await?;

        self.emit(
            ITEM_UPDATED,
            json!({ "item_id": updated.id, "item": &updated }),
        );

        Ok(updated)
    }

    /// Delete an item
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: Uuid) -> ItemResult<()> {
        self.repository.delete(id).await?;

        self.emit(ITEM_DELETED, json!({ "item_id": id }));

        Ok(())
    }
}

impl<R: ItemRepository, Z: ZipcodeClient> Clone for ItemService<R, Z> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            zipcodes: Arc::clone(&self.zipcodes),
            events: self.events.clone(),
        }
    }
}
