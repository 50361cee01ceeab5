//! # mks-api — Axum API Service for Makerspace Operations
//!
//! HTTP surface over the `mks-core` domain model: asset and inventory
//! records with photo attachments.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                 | Domain             |
//! |-------------------------|------------------------|--------------------|
//! | `/v1/assets/*`          | [`routes::assets`]     | Asset records      |
//! | `/v1/inventory/*`       | [`routes::inventory`]  | Inventory items    |
//! | `/v1/quests`            | [`routes::quests`]     | Reserved (501)     |
//! | `/openapi.json`         | [`openapi`]            | API specification  |
//! | `/health/*`             | (unauthenticated)      | Probes             |
//!
//! ## Storage model
//!
//! In-memory stores are authoritative for request handling. When
//! `DATABASE_URL` is set every accepted write goes through to Postgres and
//! the stores are hydrated from it at startup; photo bytes go to the
//! configured [`storage::ObjectStorage`] backend.
//!
//! ## OpenAPI
//!
//! Auto-generated spec via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod storage;
pub mod submission;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) and the OpenAPI document are mounted outside
/// the authenticated surface so they remain accessible without credentials;
/// everything under `/v1` extracts [`auth::CallerIdentity`] and therefore
/// enforces the bearer token when one is configured.
///
/// The body limit leaves room for several photos per submission: the upload
/// policy caps each file at 5 MiB and oversized files must reach the
/// validator to be reported per-file rather than dying at the transport.
pub fn app(state: AppState) -> Router {
    let api = routes::api_router()
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks the in-memory stores are accessible and, when configured, that
/// the database connection is healthy. Returns 200 "ready" or 503 with a
/// diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.assets.len();
    let _ = state.inventory.len();

    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
