//! # Quests API (reserved)
//!
//! The quests feature is planned but not built yet. The route is mounted so
//! clients get an explicit 501 with a structured body instead of a generic
//! 404 that would suggest a typo'd path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::auth::CallerIdentity;
use crate::state::AppState;

/// Build the quests router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/quests", get(list_quests))
}

/// GET /v1/quests — Not implemented.
#[utoipa::path(
    get,
    path = "/v1/quests",
    responses((status = 501, description = "Feature not implemented")),
    tag = "quests"
)]
async fn list_quests(_caller: CallerIdentity) -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({
            "error": {
                "code": "NOT_IMPLEMENTED",
                "message": "quests are not available yet"
            }
        })),
    )
        .into_response()
}
