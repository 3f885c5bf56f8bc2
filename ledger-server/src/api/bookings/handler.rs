//! Booking API Handlers
//!
//! Reads go straight to the repository; every mutation routes through the
//! ledger workflow so derived fields are recomputed and transitions are
//! validated in exactly one place.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::booking as booking_repo;
use crate::ledger::workflow;
use crate::utils::AppResult;
use shared::models::{Booking, BookingCreate, BookingStatus, BookingUpdate};

/// Query params for listing bookings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub status: Option<BookingStatus>,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/bookings - list bookings, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings =
        booking_repo::find_all(&state.pool, query.limit, query.offset, query.status).await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = workflow::get_booking(&state.pool, id).await?;
    Ok(Json(booking))
}

/// POST /api/bookings
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    let booking = workflow::create_booking(&state.pool, payload).await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/{id} - full replacement item-list semantics
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingUpdate>,
) -> AppResult<Json<Booking>> {
    let booking = workflow::update_booking(&state.pool, id, payload).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/{id}/complete - the "complete payment" shortcut
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let booking = workflow::complete_booking_payment(&state.pool, id).await?;
    Ok(Json(booking))
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<CancelRequest>>,
) -> AppResult<Json<Booking>> {
    let reason = payload.and_then(|Json(p)| p.reason);
    let booking = workflow::cancel_booking(&state.pool, id, reason).await?;
    Ok(Json(booking))
}
