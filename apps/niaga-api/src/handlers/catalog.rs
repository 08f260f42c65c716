//! Categories and units: list, create-or-get, delete.

use axum::{
    extract::{Path, State},
    Json,
};
use niaga_core::{Category, Unit};
use niaga_db::CatalogKind;
use serde::Deserialize;

use crate::handlers::orders::DeleteResponse;
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.catalog().list_categories().await?))
}

/// Returns the existing category when the name is already taken.
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.db.catalog().create_or_get_category(&request.name).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.db.catalog().delete(CatalogKind::Category, &id).await?;
    Ok(Json(DeleteResponse { id, deleted: true }))
}

pub async fn list_units(State(state): State<AppState>) -> ApiResult<Json<Vec<Unit>>> {
    Ok(Json(state.db.catalog().list_units().await?))
}

pub async fn create_unit(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> ApiResult<Json<Unit>> {
    Ok(Json(state.db.catalog().create_or_get_unit(&request.name).await?))
}

pub async fn delete_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.db.catalog().delete(CatalogKind::Unit, &id).await?;
    Ok(Json(DeleteResponse { id, deleted: true }))
}
