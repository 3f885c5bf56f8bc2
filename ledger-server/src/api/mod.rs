//! API Routing Module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`bookings`] - booking lifecycle endpoints
//! - [`customers`] - customer lookup and search endpoints
//! - [`products`] - catalog read endpoints

pub mod bookings;
pub mod customers;
pub mod health;
pub mod products;

use crate::core::ServerState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(bookings::router())
        .merge(customers::router())
        .merge(products::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
