//! # Asset API
//!
//! Asset CRUD plus photo attachment. Creation is a multipart submission so
//! photos can ride along with the entity fields; the entity is created
//! first and each attached file is then processed independently, so one bad
//! file never blocks the submission.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use mks_core::{Asset, AssetUpdate, Photo};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_validated_json;
use crate::state::{AppState, PhotoParent};
use crate::submission::{self, AddPhotosResponse, PhotoOutcome};

/// Orderings available on the asset list.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Category, then name (case-insensitive).
    Category,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub order: AssetOrder,
}

/// Response to a create submission: the new record plus the per-file
/// outcome of every attached photo.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAssetResponse {
    pub asset: Asset,
    pub photos: Vec<PhotoOutcome>,
}

/// An asset with its photo collection, for detail views.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssetWithPhotos {
    #[serde(flatten)]
    pub asset: Asset,
    pub photos: Vec<Photo>,
}

/// Build the assets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/assets", post(create_asset).get(list_assets))
        .route("/v1/assets/:id", get(get_asset).patch(update_asset))
        .route("/v1/assets/:id/photos", post(add_photos))
}

/// POST /v1/assets — Create an asset from a multipart submission.
#[utoipa::path(
    post,
    path = "/v1/assets",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Asset created", body = CreateAssetResponse),
        (status = 422, description = "Validation failure"),
    ),
    tag = "assets"
)]
async fn create_asset(
    State(state): State<AppState>,
    caller: CallerIdentity,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateAssetResponse>), AppError> {
    let parsed = submission::parse_submission(multipart).await?;
    let new = submission::new_asset_from_fields(&parsed.fields)?;

    let asset = Asset::from_new(new, Uuid::new_v4(), Utc::now());

    if let Some(pool) = &state.db_pool {
        crate::db::assets::insert(pool, &asset)
            .await
            .map_err(|e| AppError::Internal(format!("failed to persist asset: {e}")))?;
    }
    state.assets.insert(asset.id, asset.clone());

    tracing::info!(asset_id = %asset.id, name = %asset.name, "asset created");

    let photos =
        submission::process_photos(&state, PhotoParent::Asset, asset.id, parsed.files, &caller)
            .await;

    Ok((StatusCode::CREATED, Json(CreateAssetResponse { asset, photos })))
}

/// GET /v1/assets — List assets with their photos.
#[utoipa::path(
    get,
    path = "/v1/assets",
    params(("order" = Option<AssetOrder>, Query, description = "newest (default) or category")),
    responses((status = 200, description = "All assets", body = [AssetWithPhotos])),
    tag = "assets"
)]
async fn list_assets(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> Json<Vec<AssetWithPhotos>> {
    let mut assets: Vec<Asset> = state.assets.iter().map(|e| e.value().clone()).collect();
    match query.order {
        AssetOrder::Newest => {
            assets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        }
        AssetOrder::Category => {
            assets.sort_by(|a, b| {
                a.category
                    .as_str()
                    .cmp(b.category.as_str())
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
        }
    }
    let listed = assets
        .into_iter()
        .map(|asset| {
            let photos = state.asset_photos.for_parent(asset.id);
            AssetWithPhotos { asset, photos }
        })
        .collect();
    Json(listed)
}

/// GET /v1/assets/:id — Fetch one asset with its photos.
#[utoipa::path(
    get,
    path = "/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "The asset", body = AssetWithPhotos),
        (status = 404, description = "Unknown asset"),
    ),
    tag = "assets"
)]
async fn get_asset(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetWithPhotos>, AppError> {
    let asset = state
        .assets
        .get(&id)
        .map(|e| e.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;
    let photos = state.asset_photos.for_parent(id);
    Ok(Json(AssetWithPhotos { asset, photos }))
}

/// PATCH /v1/assets/:id — Partially update an asset.
#[utoipa::path(
    patch,
    path = "/v1/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body = AssetUpdate,
    responses(
        (status = 200, description = "Updated asset", body = Asset),
        (status = 404, description = "Unknown asset"),
        (status = 422, description = "Validation failure"),
    ),
    tag = "assets"
)]
async fn update_asset(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<AssetUpdate>, JsonRejection>,
) -> Result<Json<Asset>, AppError> {
    let update = extract_validated_json(body)?;

    let mut asset = state
        .assets
        .get(&id)
        .map(|e| e.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;
    update.apply(&mut asset, Utc::now());

    if let Some(pool) = &state.db_pool {
        crate::db::assets::update(pool, &asset)
            .await
            .map_err(|e| AppError::Internal(format!("failed to persist asset update: {e}")))?;
    }
    state.assets.insert(id, asset.clone());

    Ok(Json(asset))
}

/// POST /v1/assets/:id/photos — Attach photos to an existing asset.
#[utoipa::path(
    post,
    path = "/v1/assets/{id}/photos",
    params(("id" = Uuid, Path, description = "Asset ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Per-file outcomes", body = AddPhotosResponse),
        (status = 404, description = "Unknown asset"),
    ),
    tag = "assets"
)]
async fn add_photos(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AddPhotosResponse>), AppError> {
    if !state.parent_exists(PhotoParent::Asset, id) {
        return Err(AppError::NotFound(format!("asset {id} not found")));
    }

    let parsed = submission::parse_submission(multipart).await?;
    let photos =
        submission::process_photos(&state, PhotoParent::Asset, id, parsed.files, &caller).await;

    Ok((StatusCode::CREATED, Json(AddPhotosResponse { photos })))
}
