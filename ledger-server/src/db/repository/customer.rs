//! Customer Repository

use super::RepoResult;
use shared::models::{Customer, CustomerUpdate};
use shared::util::now_millis;
use sqlx::{Executor, Sqlite, SqlitePool};

const CUSTOMER_SELECT: &str = "SELECT id, mobile, name, email, location, measurements, emergency_contact, total_bookings, total_spent, last_booking_date, created_at, updated_at FROM customer";

pub async fn find_recent(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(exec: impl Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

/// Exact match on a normalized (digits-only) mobile number
pub async fn find_by_mobile(
    exec: impl Executor<'_, Database = Sqlite>,
    mobile: &str,
) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE mobile = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(mobile)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

/// Prefix search over normalized mobile numbers ("search while typing")
pub async fn search_by_mobile_prefix(
    pool: &SqlitePool,
    prefix: &str,
    limit: i64,
) -> RepoResult<Vec<Customer>> {
    let pattern = format!("{prefix}%");
    let sql = format!("{CUSTOMER_SELECT} WHERE mobile LIKE ? ORDER BY last_booking_date DESC LIMIT ?");
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn insert(exec: impl Executor<'_, Database = Sqlite>, customer: &Customer) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO customer (id, mobile, name, email, location, measurements, emergency_contact, total_bookings, total_spent, last_booking_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(customer.id)
    .bind(&customer.mobile)
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.location)
    .bind(&customer.measurements)
    .bind(&customer.emergency_contact)
    .bind(customer.total_bookings)
    .bind(customer.total_spent)
    .bind(customer.last_booking_date)
    .bind(customer.created_at)
    .bind(customer.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

/// Non-destructive partial update: present fields overwrite, absent
/// fields keep the stored value.
pub async fn update_fields(
    exec: impl Executor<'_, Database = Sqlite>,
    id: i64,
    data: &CustomerUpdate,
) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "UPDATE customer SET name = COALESCE(?, name), email = COALESCE(?, email), location = COALESCE(?, location), measurements = COALESCE(?, measurements), emergency_contact = COALESCE(?, emergency_contact), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.location)
    .bind(&data.measurements)
    .bind(&data.emergency_contact)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(())
}

/// Atomically apply booking aggregate deltas to a customer record.
///
/// Increments run inside SQL, keyed by id, so two bookings settling
/// concurrently for the same customer never lose an update.
pub async fn apply_booking_aggregates(
    exec: impl Executor<'_, Database = Sqlite>,
    id: i64,
    bookings_delta: i64,
    spent_delta: i64,
    last_booking_date: Option<i64>,
) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "UPDATE customer SET total_bookings = total_bookings + ?, total_spent = total_spent + ?, last_booking_date = COALESCE(?, last_booking_date), updated_at = ? WHERE id = ?",
    )
    .bind(bookings_delta)
    .bind(spent_delta)
    .bind(last_booking_date)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(())
}
