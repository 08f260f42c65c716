//! # niaga-db: Database Layer for Niaga
//!
//! SQLite persistence for Niaga, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Niaga Data Flow                                 │
//! │                                                                         │
//! │  axum handler (PUT /api/orders/:id)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     niaga-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ OrderRepo     │    │ 001_init.sql │   │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │              │   │   │
//! │  │   │               │    │ ShiftRepo ... │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   Rules from niaga-core are re-checked inside the transaction  │   │
//! │  │   that applies the change.                                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use niaga_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./niaga.db")).await?;
//! let low_stock = db.products().list(&ProductFilter::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::{CatalogKind, CatalogRepository};
pub use repository::order::{OrderFilter, OrderRepository, TransitionRequest};
pub use repository::product::{NewProduct, ProductFilter, ProductRepository, ProductSort, ProductUpdate};
pub use repository::shift::{ClosedShift, ShiftRepository};
pub use repository::transaction::{NewTransaction, NewTransactionLine, TransactionRepository};
