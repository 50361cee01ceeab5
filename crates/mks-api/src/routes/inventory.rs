//! # Inventory API
//!
//! Inventory item CRUD plus photo attachment. Mirrors the asset surface;
//! the default list ordering is category-then-name because the browse view
//! groups consumables and repair parts.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use mks_core::{InventoryItem, InventoryItemUpdate, Photo};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_validated_json;
use crate::state::{AppState, PhotoParent};
use crate::submission::{self, AddPhotosResponse, PhotoOutcome};

/// Orderings available on the inventory list.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InventoryOrder {
    /// Category, then name (case-insensitive).
    #[default]
    Category,
    /// Most recently created first.
    Newest,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub order: InventoryOrder,
}

/// Response to a create submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateItemResponse {
    pub item: InventoryItem,
    pub photos: Vec<PhotoOutcome>,
}

/// An inventory item with its photo collection.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemWithPhotos {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub photos: Vec<Photo>,
}

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/inventory", post(create_item).get(list_items))
        .route("/v1/inventory/:id", get(get_item).patch(update_item))
        .route("/v1/inventory/:id/photos", post(add_photos))
}

/// POST /v1/inventory — Create an inventory item from a multipart submission.
#[utoipa::path(
    post,
    path = "/v1/inventory",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Item created", body = CreateItemResponse),
        (status = 422, description = "Validation failure"),
    ),
    tag = "inventory"
)]
async fn create_item(
    State(state): State<AppState>,
    caller: CallerIdentity,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateItemResponse>), AppError> {
    let parsed = submission::parse_submission(multipart).await?;
    let new = submission::new_inventory_item_from_fields(&parsed.fields)?;

    let item = InventoryItem::from_new(new, Uuid::new_v4(), caller.user_id, Utc::now());

    if let Some(pool) = &state.db_pool {
        crate::db::inventory::insert(pool, &item)
            .await
            .map_err(|e| AppError::Internal(format!("failed to persist inventory item: {e}")))?;
    }
    state.inventory.insert(item.id, item.clone());

    tracing::info!(item_id = %item.id, name = %item.name, "inventory item created");

    let photos = submission::process_photos(
        &state,
        PhotoParent::InventoryItem,
        item.id,
        parsed.files,
        &caller,
    )
    .await;

    Ok((StatusCode::CREATED, Json(CreateItemResponse { item, photos })))
}

/// GET /v1/inventory — List inventory items with their photos.
#[utoipa::path(
    get,
    path = "/v1/inventory",
    params(("order" = Option<InventoryOrder>, Query, description = "category (default) or newest")),
    responses((status = 200, description = "All inventory items", body = [ItemWithPhotos])),
    tag = "inventory"
)]
async fn list_items(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> Json<Vec<ItemWithPhotos>> {
    let mut items: Vec<InventoryItem> = state.inventory.iter().map(|e| e.value().clone()).collect();
    match query.order {
        InventoryOrder::Category => {
            items.sort_by(|a, b| {
                a.category
                    .as_str()
                    .cmp(b.category.as_str())
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
        }
        InventoryOrder::Newest => {
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        }
    }
    let listed = items
        .into_iter()
        .map(|item| {
            let photos = state.inventory_photos.for_parent(item.id);
            ItemWithPhotos { item, photos }
        })
        .collect();
    Json(listed)
}

/// GET /v1/inventory/:id — Fetch one item with its photos.
#[utoipa::path(
    get,
    path = "/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "The item", body = ItemWithPhotos),
        (status = 404, description = "Unknown item"),
    ),
    tag = "inventory"
)]
async fn get_item(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemWithPhotos>, AppError> {
    let item = state
        .inventory
        .get(&id)
        .map(|e| e.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("inventory item {id} not found")))?;
    let photos = state.inventory_photos.for_parent(id);
    Ok(Json(ItemWithPhotos { item, photos }))
}

/// PATCH /v1/inventory/:id — Partially update an item.
#[utoipa::path(
    patch,
    path = "/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = InventoryItemUpdate,
    responses(
        (status = 200, description = "Updated item", body = InventoryItem),
        (status = 404, description = "Unknown item"),
        (status = 422, description = "Validation failure"),
    ),
    tag = "inventory"
)]
async fn update_item(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<InventoryItemUpdate>, JsonRejection>,
) -> Result<Json<InventoryItem>, AppError> {
    let update = extract_validated_json(body)?;

    let mut item = state
        .inventory
        .get(&id)
        .map(|e| e.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("inventory item {id} not found")))?;
    update.apply(&mut item, Utc::now());

    if let Some(pool) = &state.db_pool {
        crate::db::inventory::update(pool, &item).await.map_err(|e| {
            AppError::Internal(format!("failed to persist inventory update: {e}"))
        })?;
    }
    state.inventory.insert(id, item.clone());

    Ok(Json(item))
}

/// POST /v1/inventory/:id/photos — Attach photos to an existing item.
#[utoipa::path(
    post,
    path = "/v1/inventory/{id}/photos",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Per-file outcomes", body = AddPhotosResponse),
        (status = 404, description = "Unknown item"),
    ),
    tag = "inventory"
)]
async fn add_photos(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AddPhotosResponse>), AppError> {
    if !state.parent_exists(PhotoParent::InventoryItem, id) {
        return Err(AppError::NotFound(format!("inventory item {id} not found")));
    }

    let parsed = submission::parse_submission(multipart).await?;
    let photos =
        submission::process_photos(&state, PhotoParent::InventoryItem, id, parsed.files, &caller)
            .await;

    Ok((StatusCode::CREATED, Json(AddPhotosResponse { photos })))
}
