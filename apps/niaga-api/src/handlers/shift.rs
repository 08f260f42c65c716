//! Cash-drawer shift endpoints.
//!
//! `POST /api/shift` takes `{"action": "open" | "close", ...}`; `GET
//! /api/shift?cashier_id=` returns the open shift with live figures.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use niaga_core::shift::{expected_cash, ShiftClosing, ShiftOpening, ShiftStats};
use niaga_core::{Money, Shift};
use niaga_db::ClosedShift;
use serde::{Deserialize, Serialize};

use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ShiftRequest {
    Open {
        cashier_id: String,
        opening_cash: Money,
        #[serde(default)]
        notes: String,
    },
    Close {
        cashier_id: String,
        closing_cash: Money,
        #[serde(default)]
        notes: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct ShiftQuery {
    pub cashier_id: String,
}

/// The open shift and its running totals.
#[derive(Debug, Serialize)]
pub struct ActiveShift {
    pub shift: Shift,
    pub stats: ShiftStats,
    /// What the drawer should hold right now.
    pub expected_cash: Money,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShiftResponse {
    Opened(ActiveShift),
    Closed(ClosedShift),
}

pub async fn shift_action(
    State(state): State<AppState>,
    Json(request): Json<ShiftRequest>,
) -> ApiResult<(StatusCode, Json<ShiftResponse>)> {
    let shifts = state.db.shifts();

    match request {
        ShiftRequest::Open {
            cashier_id,
            opening_cash,
            notes,
        } => {
            let opening = ShiftOpening::new(&cashier_id, opening_cash, &notes)?;
            let shift = shifts.open(&opening).await?;
            let stats = ShiftStats::default();

            Ok((
                StatusCode::CREATED,
                Json(ShiftResponse::Opened(ActiveShift {
                    expected_cash: expected_cash(shift.opening_cash, &stats),
                    shift,
                    stats,
                })),
            ))
        }
        ShiftRequest::Close {
            cashier_id,
            closing_cash,
            notes,
        } => {
            let closing = ShiftClosing::new(closing_cash, &notes)?;
            let closed = shifts.close(cashier_id.trim(), &closing).await?;
            Ok((StatusCode::OK, Json(ShiftResponse::Closed(closed))))
        }
    }
}

/// `null` when the cashier has no open shift.
pub async fn get_active_shift(
    State(state): State<AppState>,
    Query(query): Query<ShiftQuery>,
) -> ApiResult<Json<Option<ActiveShift>>> {
    let shifts = state.db.shifts();

    let Some(shift) = shifts.active(query.cashier_id.trim()).await? else {
        return Ok(Json(None));
    };
    let stats = shifts.stats(&shift.id).await?;

    Ok(Json(Some(ActiveShift {
        expected_cash: expected_cash(shift.opening_cash, &stats),
        shift,
        stats,
    })))
}
