//! Product endpoints. Listings double as the stock query.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use niaga_core::{Product, StockStatus};
use niaga_db::{NewProduct, ProductFilter, ProductUpdate};
use serde::Serialize;

use crate::handlers::orders::DeleteResponse;
use crate::{ApiResult, AppState};

/// A product with its derived stock label.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub stock_status: StockStatus,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        ProductView {
            stock_status: product.stock_status(),
            product,
        }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<ProductView>>> {
    let products = state.db.products().list(&filter).await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductView>> {
    let product = state.db.products().get(&id).await?;
    Ok(Json(product.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<ProductView>)> {
    let product = state.db.products().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductUpdate>,
) -> ApiResult<Json<ProductView>> {
    let product = state.db.products().update(&id, &input).await?;
    Ok(Json(product.into()))
}

/// Fails with 409 while orders or sales still reference the product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.db.products().delete(&id).await?;
    Ok(Json(DeleteResponse { id, deleted: true }))
}
