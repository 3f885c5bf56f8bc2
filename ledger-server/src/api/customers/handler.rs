//! Customer API Handlers
//!
//! Customers are created and merged only through booking writes; this
//! surface is read-only.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::customer as customer_repo;
use crate::ledger::resolver;
use crate::utils::{AppError, AppResult};
use shared::models::Customer;

/// Query params for listing customers
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub mobile: String,
}

/// GET /api/customers - list customers, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer_repo::find_recent(&state.pool, query.limit, query.offset).await?;
    Ok(Json(customers))
}

/// GET /api/customers/search?mobile=612 - prefix search while typing.
/// Assists manual selection only; resolution always matches exactly.
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = resolver::search_by_partial_mobile(&state.pool, &query.mobile).await?;
    Ok(Json(customers))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let customer = customer_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {id}")))?;
    Ok(Json(customer))
}
