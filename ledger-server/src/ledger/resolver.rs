//! Customer Resolver - matches an inbound contact payload to a stored
//! customer record or creates one
//!
//! Identity is decided by exact match on the normalized mobile number
//! only. The prefix search below is a separate read-only path that
//! assists manual selection while typing; it never resolves identity.

use super::error::{LedgerError, LedgerResult};
use crate::db::repository::customer as customer_repo;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::models::{Customer, CustomerPayload, CustomerUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

/// Minimum digits before a partial-mobile search runs
pub const MIN_SEARCH_DIGITS: usize = 3;

/// Default result cap for the partial-mobile search
const SEARCH_LIMIT: i64 = 20;

/// Strip every non-digit character from a mobile number.
pub fn normalize_mobile(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validate an inbound customer payload. Mobile and name are required.
pub fn validate_customer(payload: &CustomerPayload) -> LedgerResult<()> {
    if normalize_mobile(&payload.mobile).is_empty() {
        return Err(LedgerError::validation(
            "mobile",
            "must contain at least one digit",
        ));
    }
    validate_required_text(&payload.mobile, "mobile", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.measurements, "measurements", MAX_NOTE_LEN)?;
    validate_optional_text(
        &payload.emergency_contact,
        "emergency_contact",
        MAX_SHORT_TEXT_LEN,
    )?;
    Ok(())
}

/// Build the non-destructive partial update applied to a matched record:
/// name always reflects the most recent payload, optional contact fields
/// overwrite only when present.
fn merge_payload(payload: &CustomerPayload) -> CustomerUpdate {
    CustomerUpdate {
        name: Some(payload.name.clone()),
        email: payload.email.clone(),
        location: payload.location.clone(),
        measurements: payload.measurements.clone(),
        emergency_contact: payload.emergency_contact.clone(),
    }
}

/// Resolve a payload to a customer id inside the caller's transaction.
///
/// Returns the up-to-date record and whether it was created. The caller
/// must have validated the payload first.
pub async fn resolve(
    conn: &mut SqliteConnection,
    payload: &CustomerPayload,
) -> LedgerResult<(Customer, bool)> {
    let mobile = normalize_mobile(&payload.mobile);

    if let Some(existing) = customer_repo::find_by_mobile(&mut *conn, &mobile).await? {
        customer_repo::update_fields(&mut *conn, existing.id, &merge_payload(payload)).await?;
        let updated = customer_repo::find_by_id(&mut *conn, existing.id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("Customer {}", existing.id)))?;
        return Ok((updated, false));
    }

    let now = now_millis();
    let customer = Customer {
        id: snowflake_id(),
        mobile,
        name: payload.name.clone(),
        email: payload.email.clone(),
        location: payload.location.clone(),
        measurements: payload.measurements.clone(),
        emergency_contact: payload.emergency_contact.clone(),
        total_bookings: 0,
        total_spent: 0,
        last_booking_date: None,
        created_at: now,
        updated_at: now,
    };
    customer_repo::insert(&mut *conn, &customer).await?;
    tracing::info!(customer_id = customer.id, "Customer created");
    Ok((customer, true))
}

/// Read-only prefix search over normalized mobile numbers.
pub async fn search_by_partial_mobile(
    pool: &SqlitePool,
    prefix: &str,
) -> LedgerResult<Vec<Customer>> {
    let digits = normalize_mobile(prefix);
    if digits.len() < MIN_SEARCH_DIGITS {
        return Err(LedgerError::validation(
            "mobile",
            format!("search requires at least {MIN_SEARCH_DIGITS} digits"),
        ));
    }
    let customers = customer_repo::search_by_mobile_prefix(pool, &digits, SEARCH_LIMIT).await?;
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn payload(mobile: &str, name: &str) -> CustomerPayload {
        CustomerPayload {
            mobile: mobile.to_string(),
            name: name.to_string(),
            email: None,
            location: None,
            measurements: None,
            emergency_contact: None,
        }
    }

    #[test]
    fn test_normalize_mobile_strips_non_digits() {
        assert_eq!(normalize_mobile("+34 612-345-678"), "34612345678");
        assert_eq!(normalize_mobile("9999999999"), "9999999999");
        assert_eq!(normalize_mobile("abc"), "");
    }

    #[test]
    fn test_validate_customer_requires_mobile_and_name() {
        let err = validate_customer(&payload("", "Ana")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "mobile"));

        let err = validate_customer(&payload("612345678", "  ")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "name"));

        assert!(validate_customer(&payload("612 345 678", "Ana")).is_ok());
    }

    #[tokio::test]
    async fn test_resolve_creates_then_merges_by_normalized_mobile() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let (first, created) = resolve(&mut conn, &payload("612-345-678", "Ana"))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.mobile, "612345678");
        assert_eq!(first.name, "Ana");

        // Same digits, different formatting and name: one record, name updated
        let mut second_payload = payload("612 345 678", "Ana García");
        second_payload.email = Some("ana@example.com".to_string());
        let (second, created) = resolve(&mut conn, &second_payload).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Ana García");
        assert_eq!(second.email.as_deref(), Some("ana@example.com"));

        // Absent fields keep the stored value
        let (third, created) = resolve(&mut conn, &payload("612345678", "Ana G.")).await.unwrap();
        assert!(!created);
        assert_eq!(third.email.as_deref(), Some("ana@example.com"));

        // Release the pool's single connection before querying through it
        drop(conn);
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_search_requires_three_digits_and_matches_prefix() {
        let pool = test_pool().await;
        {
            let mut conn = pool.acquire().await.unwrap();
            resolve(&mut conn, &payload("612345678", "Ana")).await.unwrap();
            resolve(&mut conn, &payload("612999999", "Berta")).await.unwrap();
            resolve(&mut conn, &payload("700000000", "Carla")).await.unwrap();
        }

        let err = search_by_partial_mobile(&pool, "61").await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));

        let found = search_by_partial_mobile(&pool, "612").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.mobile.starts_with("612")));

        // Formatting in the prefix is normalized away too
        let found = search_by_partial_mobile(&pool, "6-1-2").await.unwrap();
        assert_eq!(found.len(), 2);
    }
}
