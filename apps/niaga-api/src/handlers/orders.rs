//! Purchase and sales order endpoints.
//!
//! ```text
//! POST   /api/orders          create draft
//! GET    /api/orders          list (?kind=&status=)
//! GET    /api/orders/{id}     detail + available transitions
//! PATCH  /api/orders/{id}     edit content (draft actions)
//! PUT    /api/orders/{id}     status transition
//! DELETE /api/orders/{id}     delete draft
//! ```

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use niaga_core::draft::{DraftAction, OrderDraft};
use niaga_core::status::{available_transitions, selectable_statuses};
use niaga_core::validation::{validate_monetary_amount, validate_quantity, validate_required_text};
use niaga_core::{Discount, Money, Order, OrderKind, OrderStatus, StatusPolicy};
use niaga_db::{OrderFilter, TransitionRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiResult, AppState};

// =============================================================================
// Request / Response Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub kind: OrderKind,
    /// Supplier for purchases, customer for sales.
    #[serde(default, alias = "supplier_id", alias = "customer_id")]
    pub counterparty_id: Option<String>,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub expected_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<CreateOrderItem>,
    /// Order-level discount.
    #[serde(default)]
    pub discount_amount: Money,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub terms_conditions: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderItem {
    pub product_id: String,
    pub quantity: i64,
    /// Defaults to the product's cost (purchase) or sell price (sales).
    #[serde(default)]
    pub unit_price: Option<Money>,
    #[serde(default)]
    pub discount: Discount,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    /// Defaults to the version read at the start of the request.
    #[serde(default)]
    pub expected_version: Option<i64>,
    pub actions: Vec<DraftAction>,
}

/// An order together with what the caller may do next.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub available_transitions: Vec<OrderStatus>,
    /// Options for the status picker: the current status, then the legal moves.
    pub selectable_statuses: Vec<OrderStatus>,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl OrderResponse {
    pub fn new(order: Order, policy: &StatusPolicy) -> Self {
        OrderResponse {
            available_transitions: available_transitions(order.status, order.kind),
            selectable_statuses: selectable_statuses(order.status, order.kind),
            can_edit: policy.can_edit(order.status, order.kind),
            can_delete: policy.can_delete(order.status),
            order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    debug!(kind = request.kind.as_str(), items = request.items.len(), "Create order request");

    let mut draft = OrderDraft::new(request.kind)
        .apply(DraftAction::SetCounterparty {
            counterparty_id: request.counterparty_id,
        })
        .apply(DraftAction::SetOrderDate {
            date: request.order_date,
        })
        .apply(DraftAction::SetExpectedDate {
            date: request.expected_date,
        })
        .apply(DraftAction::SetOrderDiscount {
            amount: request.discount_amount,
        })
        .apply(DraftAction::SetNotes {
            notes: request.notes,
        })
        .apply(DraftAction::SetShippingAddress {
            shipping_address: request.shipping_address,
        })
        .apply(DraftAction::SetTermsConditions {
            terms_conditions: request.terms_conditions,
        });

    for item in request.items {
        let product_id = validate_required_text("product_id", &item.product_id)?;
        validate_quantity(item.quantity)?;
        if let Some(price) = item.unit_price {
            validate_monetary_amount("unit_price", price)?;
        }

        let product = state.db.products().get(&product_id).await?;
        let unit_price = item.unit_price.unwrap_or(match request.kind {
            OrderKind::Purchase => product.cost,
            OrderKind::Sales => product.price,
        });

        draft = draft.apply(DraftAction::AddItem {
            product_id: product.id.clone(),
            product_name: product.name,
            product_code: product.code,
            unit_price,
            quantity: item.quantity,
        });

        let Some(index) = draft.items.iter().position(|l| l.product_id == product.id) else {
            continue;
        };
        draft = match item.discount.clamped() {
            Discount::None => draft,
            Discount::Percentage(percentage) => {
                draft.apply(DraftAction::SetDiscountPercentage { index, percentage })
            }
            Discount::Amount(amount) => draft.apply(DraftAction::SetDiscountAmount { index, amount }),
        };
    }

    let tax_rate = state.settings.orders.tax_rate(draft.kind);
    let order = state.db.orders().create(&draft, tax_rate).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::new(order, &state.policy())),
    ))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let policy = state.policy();
    let orders = state.db.orders().list(&filter).await?;

    Ok(Json(
        orders
            .into_iter()
            .map(|order| OrderResponse::new(order, &policy))
            .collect(),
    ))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderResponse>> {
    let order = state.db.orders().get(&id).await?;
    Ok(Json(OrderResponse::new(order, &state.policy())))
}

/// Applies draft actions to the stored order and saves the result.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let policy = state.policy();
    let orders = state.db.orders();

    let current = orders.get(&id).await?;
    policy.ensure_editable(&current.order_number, current.kind, current.status)?;

    // Unknown products are a 404 here, not a foreign key failure on save.
    for action in &request.actions {
        if let DraftAction::AddItem { product_id, .. } = action {
            state.db.products().get(product_id).await?;
        }
    }

    let draft = request
        .actions
        .into_iter()
        .fold(OrderDraft::from_order(&current), OrderDraft::apply);

    let expected_version = request.expected_version.unwrap_or(current.version);
    let order = orders
        .update_content(&id, &draft, Some(expected_version), &policy)
        .await?;

    Ok(Json(OrderResponse::new(order, &policy)))
}

pub async fn transition_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let policy = state.policy();
    let order = state.db.orders().transition(&id, &request, &policy).await?;
    Ok(Json(OrderResponse::new(order, &policy)))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.db.orders().delete(&id, &state.policy()).await?;
    Ok(Json(DeleteResponse { id, deleted: true }))
}
