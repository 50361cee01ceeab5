//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Static bearer token. Set via MKS_AUTH_TOKEN env var; \
                             when unset the API runs unauthenticated.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MKS API — Makerspace Operations",
        version = "0.1.0",
        description = "Asset and inventory tracking for a community makerspace.\n\nProvides:\n- **Assets**: tools, machines, and safety gear with maintenance metadata\n- **Inventory**: consumables and repair parts with stock levels\n- **Photos**: multipart photo attachment with per-file validation and a single primary photo per record\n\nAuthentication: Bearer token via `Authorization: Bearer <token>` header. All `/v1/*` endpoints require authentication when a token is configured. Health probes (`/health/*`) are unauthenticated.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        // ── Assets ──────────────────────────────────────────────────────
        crate::routes::assets::create_asset,
        crate::routes::assets::list_assets,
        crate::routes::assets::get_asset,
        crate::routes::assets::update_asset,
        crate::routes::assets::add_photos,
        // ── Inventory ───────────────────────────────────────────────────
        crate::routes::inventory::create_item,
        crate::routes::inventory::list_items,
        crate::routes::inventory::get_item,
        crate::routes::inventory::update_item,
        crate::routes::inventory::add_photos,
        // ── Quests (reserved) ───────────────────────────────────────────
        crate::routes::quests::list_quests,
    ),
    components(schemas(
        mks_core::Asset,
        mks_core::NewAsset,
        mks_core::AssetUpdate,
        mks_core::AssetCategory,
        mks_core::AssetStatus,
        mks_core::Shop,
        mks_core::InventoryItem,
        mks_core::NewInventoryItem,
        mks_core::InventoryItemUpdate,
        mks_core::InventoryCategory,
        mks_core::ConsumableType,
        mks_core::InventoryStatus,
        mks_core::Photo,
        crate::submission::PhotoOutcome,
        crate::submission::PhotoUploadStatus,
        crate::submission::AddPhotosResponse,
        crate::routes::assets::CreateAssetResponse,
        crate::routes::assets::AssetWithPhotos,
        crate::routes::assets::AssetOrder,
        crate::routes::inventory::CreateItemResponse,
        crate::routes::inventory::ItemWithPhotos,
        crate::routes::inventory::InventoryOrder,
    )),
    tags(
        (name = "assets", description = "Asset records and their photos"),
        (name = "inventory", description = "Inventory items and their photos"),
        (name = "quests", description = "Reserved; not implemented"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

/// GET /openapi.json — the assembled specification.
async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_contains_all_resource_paths() {
        let spec = ApiDoc::openapi();
        for path in [
            "/v1/assets",
            "/v1/assets/{id}",
            "/v1/assets/{id}/photos",
            "/v1/inventory",
            "/v1/inventory/{id}",
            "/v1/inventory/{id}/photos",
            "/v1/quests",
        ] {
            assert!(
                spec.paths.paths.contains_key(path),
                "missing path in OpenAPI spec: {path}"
            );
        }
    }
}
