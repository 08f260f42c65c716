//! Request handlers, one module per resource.

pub mod catalog;
pub mod health;
pub mod orders;
pub mod products;
pub mod shift;
pub mod transactions;
