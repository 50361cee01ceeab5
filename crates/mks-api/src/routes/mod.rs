//! # HTTP Route Handlers
//!
//! One module per resource family. Handlers are thin: extract and validate,
//! call into the state/persistence layers, shape the response. All domain
//! rules live below this layer.

pub mod assets;
pub mod inventory;
pub mod quests;

use axum::Router;

use crate::state::AppState;

/// The full API surface (each resource router mounts its own `/v1` paths).
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(assets::router())
        .merge(inventory::router())
        .merge(quests::router())
}
