//! Items API routes
//!
//! This module wires up the items domain to HTTP routes.

use axum::Router;
use domain_items::{HttpZipcodeClient, ItemService, MongoItemRepository, handlers};
use tracing::info;

use crate::state::AppState;

/// Create items router
pub fn router(state: &AppState) -> Router {
    // Create the MongoDB repository
    let repository = MongoItemRepository::new(state.db.clone());

    // Create the zipcode lookup client (ZIP_API_BASE_URL overrides the default)
    let zipcodes = HttpZipcodeClient::from_env();

    // Create the service, publishing mutations to the shared bus
    let service = ItemService::new(repository, zipcodes).with_events(state.events.clone());

    // Return the domain's router
    handlers::router(service)
}

/// Initialize item indexes in MongoDB
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    let repository = MongoItemRepository::new(db.clone());
    repository
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create item indexes: {}", e))?;
    info!("Item collection indexes created");
    Ok(())
}
