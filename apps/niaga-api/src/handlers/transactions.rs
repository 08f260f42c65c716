//! Counter sales.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use niaga_core::PosTransaction;
use niaga_db::NewTransaction;

use crate::{ApiResult, AppState};

/// Records a sale against the cashier's open shift at the POS tax rate.
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(sale): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<PosTransaction>)> {
    let tax_rate = state.settings.orders.pos_tax_rate();
    let transaction = state.db.transactions().record(&sale, tax_rate).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PosTransaction>> {
    Ok(Json(state.db.transactions().get(&id).await?))
}
