//! API routes module
//!
//! This module defines all HTTP API routes for the Items API.

pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/items", items::router(state))
        .merge(health::router(state.clone()))
}
