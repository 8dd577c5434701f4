//! Item event names and listeners.
//!
//! The service emits one event per mutation; the listeners here are the
//! default subscribers, registered once at application startup.

use event_bus::{DomainEvent, EventBus};
use tracing::info;

/// Emitted after an item is created; payload carries `item_id` and `item`.
pub const ITEM_CREATED: &str = "item_created";
/// Emitted after an item is updated; payload carries `item_id` and `item`.
pub const ITEM_UPDATED: &str = "item_updated";
/// Emitted after an item is deleted; payload carries `item_id`.
pub const ITEM_DELETED: &str = "item_deleted";

/// Register all item-related event listeners.
pub fn register_item_listeners(bus: &EventBus) {
    info!("Registering item event listeners");
    bus.on(ITEM_CREATED, on_item_created);
    bus.on(ITEM_UPDATED, on_item_updated);
    bus.on(ITEM_DELETED, on_item_deleted);
}

fn on_item_created(event: DomainEvent) {
    info!(item_id = %event.payload["item_id"], "Item created event received");
    // TODO: notify downstream consumers once a notification channel exists
}

fn on_item_updated(event: DomainEvent) {
    info!(item_id = %event.payload["item_id"], "Item updated event received");
}

fn on_item_deleted(event: DomainEvent) {
    info!(item_id = %event.payload["item_id"], "Item deleted event received");
}
