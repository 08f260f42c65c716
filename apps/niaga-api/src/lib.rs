//! # Niaga API
//!
//! JSON REST service for purchase orders, sales orders, cash-drawer shifts
//! and counter sales.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Niaga API                                       │
//! │                                                                         │
//! │  Dashboard ───► HTTP (8080) ───► handlers ───► niaga-db ───► SQLite     │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                                 niaga-core                              │
//! │                     (totals, status machine, shift math)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::Settings`]. Everything can be overridden with `NIAGA_*`
//! environment variables.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use niaga_core::StatusPolicy;
use niaga_db::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Settings;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        AppState {
            db,
            settings: Arc::new(settings),
        }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.settings.orders.policy()
    }
}

/// Builds the router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health_routes())
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
