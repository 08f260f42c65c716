//! Route table.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Everything under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Purchase and sales orders
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/orders/{id}",
            get(handlers::orders::get_order)
                .patch(handlers::orders::update_order)
                .put(handlers::orders::transition_order)
                .delete(handlers::orders::delete_order),
        )
        // Cash-drawer shift
        .route(
            "/shift",
            get(handlers::shift::get_active_shift).post(handlers::shift::shift_action),
        )
        // Products and their lookups
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/categories",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        .route("/categories/{id}", delete(handlers::catalog::delete_category))
        .route(
            "/units",
            get(handlers::catalog::list_units).post(handlers::catalog::create_unit),
        )
        .route("/units/{id}", delete(handlers::catalog::delete_unit))
        // Counter sales
        .route("/transactions", post(handlers::transactions::record_transaction))
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
}
