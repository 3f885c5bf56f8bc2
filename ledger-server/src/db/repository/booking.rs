//! Booking Repository
//!
//! A booking persists as a single row: denormalized customer snapshot,
//! item snapshots as a JSON column, rollups, workflow state and the
//! optimistic `version` token. Keeping the aggregate in one row makes
//! every mutation a single-record read-modify-write.

use super::{RepoError, RepoResult};
use shared::models::{Booking, BookingStatus, BookingTotals, CustomerSnapshot};
use sqlx::{Executor, Sqlite, SqlitePool};

const BOOKING_SELECT: &str = "SELECT id, customer_id, customer_name, customer_mobile, customer_email, customer_location, items, total_price, total_paid, total_pending, total_security, total_transport_cost, total_dry_cleaning_cost, total_repair_cost, total_operational_cost, gross_profit, net_profit, status, canceled_at, cancel_reason, rental_duration, return_deadline, payment_method, notes, version, created_at, updated_at FROM booking";

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: i64,
    customer_id: i64,
    customer_name: String,
    customer_mobile: String,
    customer_email: Option<String>,
    customer_location: Option<String>,
    items: String,
    total_price: i64,
    total_paid: i64,
    total_pending: i64,
    total_security: i64,
    total_transport_cost: i64,
    total_dry_cleaning_cost: i64,
    total_repair_cost: i64,
    total_operational_cost: i64,
    gross_profit: i64,
    net_profit: i64,
    status: String,
    canceled_at: Option<i64>,
    cancel_reason: Option<String>,
    rental_duration: Option<i64>,
    return_deadline: Option<String>,
    payment_method: Option<String>,
    notes: Option<String>,
    version: i64,
    created_at: i64,
    updated_at: i64,
}

fn status_to_str(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Active => "ACTIVE",
        BookingStatus::Completed => "COMPLETED",
        BookingStatus::Canceled => "CANCELED",
    }
}

fn status_from_str(s: &str) -> RepoResult<BookingStatus> {
    match s {
        "ACTIVE" => Ok(BookingStatus::Active),
        "COMPLETED" => Ok(BookingStatus::Completed),
        "CANCELED" => Ok(BookingStatus::Canceled),
        other => Err(RepoError::Database(format!(
            "unknown booking status '{other}'"
        ))),
    }
}

fn row_to_booking(row: BookingRow) -> RepoResult<Booking> {
    let items = serde_json::from_str(&row.items)
        .map_err(|e| RepoError::Database(format!("corrupt items payload: {e}")))?;
    Ok(Booking {
        id: row.id,
        customer: CustomerSnapshot {
            customer_id: row.customer_id,
            name: row.customer_name,
            mobile: row.customer_mobile,
            email: row.customer_email,
            location: row.customer_location,
        },
        items,
        totals: BookingTotals {
            total_price: row.total_price,
            total_paid: row.total_paid,
            total_pending: row.total_pending,
            total_security: row.total_security,
            total_transport_cost: row.total_transport_cost,
            total_dry_cleaning_cost: row.total_dry_cleaning_cost,
            total_repair_cost: row.total_repair_cost,
            total_operational_cost: row.total_operational_cost,
            gross_profit: row.gross_profit,
            net_profit: row.net_profit,
        },
        status: status_from_str(&row.status)?,
        canceled_at: row.canceled_at,
        cancel_reason: row.cancel_reason,
        rental_duration: row.rental_duration,
        return_deadline: row.return_deadline,
        payment_method: row.payment_method,
        notes: row.notes,
        version: row.version,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn items_json(booking: &Booking) -> RepoResult<String> {
    serde_json::to_string(&booking.items)
        .map_err(|e| RepoError::Database(format!("failed to encode items: {e}")))
}

pub async fn find_all(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
    status: Option<BookingStatus>,
) -> RepoResult<Vec<Booking>> {
    let rows: Vec<BookingRow> = match status {
        Some(s) => {
            let sql = format!(
                "{BOOKING_SELECT} WHERE status = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
            );
            sqlx::query_as(&sql)
                .bind(status_to_str(s))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{BOOKING_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
            sqlx::query_as(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };
    rows.into_iter().map(row_to_booking).collect()
}

pub async fn find_by_id(
    exec: impl Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Booking>> {
    let sql = format!("{BOOKING_SELECT} WHERE id = ?");
    let row: Option<BookingRow> = sqlx::query_as(&sql).bind(id).fetch_optional(exec).await?;
    row.map(row_to_booking).transpose()
}

pub async fn insert(
    exec: impl Executor<'_, Database = Sqlite>,
    booking: &Booking,
) -> RepoResult<()> {
    let items = items_json(booking)?;
    sqlx::query(
        "INSERT INTO booking (id, customer_id, customer_name, customer_mobile, customer_email, customer_location, items, total_price, total_paid, total_pending, total_security, total_transport_cost, total_dry_cleaning_cost, total_repair_cost, total_operational_cost, gross_profit, net_profit, status, canceled_at, cancel_reason, rental_duration, return_deadline, payment_method, notes, version, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(booking.id)
    .bind(booking.customer.customer_id)
    .bind(&booking.customer.name)
    .bind(&booking.customer.mobile)
    .bind(&booking.customer.email)
    .bind(&booking.customer.location)
    .bind(items)
    .bind(booking.totals.total_price)
    .bind(booking.totals.total_paid)
    .bind(booking.totals.total_pending)
    .bind(booking.totals.total_security)
    .bind(booking.totals.total_transport_cost)
    .bind(booking.totals.total_dry_cleaning_cost)
    .bind(booking.totals.total_repair_cost)
    .bind(booking.totals.total_operational_cost)
    .bind(booking.totals.gross_profit)
    .bind(booking.totals.net_profit)
    .bind(status_to_str(booking.status))
    .bind(booking.canceled_at)
    .bind(&booking.cancel_reason)
    .bind(booking.rental_duration)
    .bind(&booking.return_deadline)
    .bind(&booking.payment_method)
    .bind(&booking.notes)
    .bind(booking.version)
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

/// Write a booking back conditioned on the version the caller read.
///
/// Returns false when zero rows matched, i.e. the record was concurrently
/// modified (or deleted) since that read. `booking.version` must already
/// carry the incremented value.
pub async fn update_with_version(
    exec: impl Executor<'_, Database = Sqlite>,
    booking: &Booking,
    expected_version: i64,
) -> RepoResult<bool> {
    let items = items_json(booking)?;
    let rows = sqlx::query(
        "UPDATE booking SET customer_id = ?, customer_name = ?, customer_mobile = ?, customer_email = ?, customer_location = ?, items = ?, total_price = ?, total_paid = ?, total_pending = ?, total_security = ?, total_transport_cost = ?, total_dry_cleaning_cost = ?, total_repair_cost = ?, total_operational_cost = ?, gross_profit = ?, net_profit = ?, status = ?, canceled_at = ?, cancel_reason = ?, rental_duration = ?, return_deadline = ?, payment_method = ?, notes = ?, version = ?, updated_at = ? WHERE id = ? AND version = ?",
    )
    .bind(booking.customer.customer_id)
    .bind(&booking.customer.name)
    .bind(&booking.customer.mobile)
    .bind(&booking.customer.email)
    .bind(&booking.customer.location)
    .bind(items)
    .bind(booking.totals.total_price)
    .bind(booking.totals.total_paid)
    .bind(booking.totals.total_pending)
    .bind(booking.totals.total_security)
    .bind(booking.totals.total_transport_cost)
    .bind(booking.totals.total_dry_cleaning_cost)
    .bind(booking.totals.total_repair_cost)
    .bind(booking.totals.total_operational_cost)
    .bind(booking.totals.gross_profit)
    .bind(booking.totals.net_profit)
    .bind(status_to_str(booking.status))
    .bind(booking.canceled_at)
    .bind(&booking.cancel_reason)
    .bind(booking.rental_duration)
    .bind(&booking.return_deadline)
    .bind(&booking.payment_method)
    .bind(&booking.notes)
    .bind(booking.version)
    .bind(booking.updated_at)
    .bind(booking.id)
    .bind(expected_version)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() > 0)
}
