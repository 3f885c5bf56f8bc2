//! Booking Workflow - lifecycle state machine over bookings
//!
//! Every mutation is one atomic read-modify-write against a single
//! booking row: load inside a transaction, re-derive every computed
//! field from raw inputs, write back conditioned on the version the row
//! was read at. A failed optimistic write surfaces
//! [`LedgerError::ConcurrentModification`] for the caller to retry with
//! a fresh read; the engine never retries silently (a retry could apply
//! the completion side effect twice).
//!
//! Customer running aggregates are applied as SQL increments keyed by
//! customer id in the same transaction, never as a read-modify-write of
//! a cached copy.

use super::aggregator::recompute;
use super::calculator::validate_items;
use super::error::{LedgerError, LedgerResult};
use super::resolver;
use crate::db::repository::{
    booking as booking_repo, customer as customer_repo, product as product_repo,
};
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use shared::models::{
    Booking, BookingCreate, BookingItem, BookingItemInput, BookingStatus, BookingUpdate, Customer,
    CustomerSnapshot,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

fn db_err(err: sqlx::Error) -> LedgerError {
    LedgerError::Database(err.to_string())
}

fn snapshot_of(customer: &Customer) -> CustomerSnapshot {
    CustomerSnapshot {
        customer_id: customer.id,
        name: customer.name.clone(),
        mobile: customer.mobile.clone(),
        email: customer.email.clone(),
        location: customer.location.clone(),
    }
}

/// Guard that a booking still accepts mutations.
fn require_active(booking: &Booking) -> LedgerResult<()> {
    if booking.status.is_terminal() {
        return Err(LedgerError::InvalidTransition {
            from: booking.status,
        });
    }
    Ok(())
}

fn validate_passthrough(
    notes: &Option<String>,
    payment_method: &Option<String>,
    return_deadline: &Option<String>,
    rental_duration: Option<i64>,
) -> LedgerResult<()> {
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    validate_optional_text(payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(return_deadline, "return_deadline", MAX_SHORT_TEXT_LEN)?;
    if let Some(d) = rental_duration
        && d < 0
    {
        return Err(LedgerError::validation(
            "rental_duration",
            format!("must be non-negative, got {d}"),
        ));
    }
    Ok(())
}

/// Pre-fill missing prices from the catalog product the item is being
/// attached to. Runs only when the caller did not supply a price; the
/// engine never re-validates stored prices against the live catalog.
async fn prefill_catalog_prices(
    conn: &mut SqliteConnection,
    inputs: &mut [BookingItemInput],
) -> LedgerResult<()> {
    for input in inputs.iter_mut() {
        if input.original_price.is_some() && input.price_after_bargain.is_some() {
            continue;
        }
        let Some(dress_id) = input.dress_id else {
            continue;
        };
        match product_repo::find_by_id(&mut *conn, dress_id).await? {
            Some(product) => {
                if input.original_price.is_none() {
                    input.original_price = Some(product.price);
                }
                if input.price_after_bargain.is_none() {
                    input.price_after_bargain = Some(product.price);
                }
            }
            None => {
                tracing::warn!(dress_id, "Catalog product not found, item prices default to 0");
            }
        }
    }
    Ok(())
}

/// Project stored items onto the inputs of the complete-payment effect:
/// each item's final payment absorbs its pending balance. Recomputation
/// then drives every `pending` to 0.
fn apply_completion(items: &[BookingItem]) -> Vec<BookingItemInput> {
    items
        .iter()
        .map(|item| {
            let mut input = BookingItemInput::from(item);
            input.final_payment = Some(item.final_payment + item.pending);
            input
        })
        .collect()
}

/// Create a booking with `status = active`.
pub async fn create_booking(pool: &SqlitePool, payload: BookingCreate) -> LedgerResult<Booking> {
    resolver::validate_customer(&payload.customer)?;
    validate_items(&payload.items)?;
    validate_passthrough(
        &payload.notes,
        &payload.payment_method,
        &payload.return_deadline,
        payload.rental_duration,
    )?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    let (customer, _) = resolver::resolve(&mut tx, &payload.customer).await?;

    let mut inputs = payload.items;
    prefill_catalog_prices(&mut tx, &mut inputs).await?;
    let (items, totals) = recompute(&inputs)?;

    let now = now_millis();
    let booking = Booking {
        id: snowflake_id(),
        customer: snapshot_of(&customer),
        items,
        totals,
        status: BookingStatus::Active,
        canceled_at: None,
        cancel_reason: None,
        rental_duration: payload.rental_duration,
        return_deadline: payload.return_deadline,
        payment_method: payload.payment_method,
        notes: payload.notes,
        version: 1,
        created_at: now,
        updated_at: now,
    };

    booking_repo::insert(&mut *tx, &booking).await?;
    customer_repo::apply_booking_aggregates(
        &mut *tx,
        customer.id,
        1,
        booking.totals.total_price,
        Some(now),
    )
    .await?;

    tx.commit().await.map_err(db_err)?;
    tracing::info!(
        booking_id = booking.id,
        customer_id = customer.id,
        total_price = booking.totals.total_price,
        "Booking created"
    );
    Ok(booking)
}

/// Update an active booking.
///
/// `items`, when present, replaces the stored list wholesale; the engine
/// then re-derives every computed field. A `status` in the same payload
/// requests a transition after the update is applied.
pub async fn update_booking(
    pool: &SqlitePool,
    id: i64,
    payload: BookingUpdate,
) -> LedgerResult<Booking> {
    if let Some(customer) = &payload.customer {
        resolver::validate_customer(customer)?;
    }
    if let Some(items) = &payload.items {
        validate_items(items)?;
    }
    validate_passthrough(
        &payload.notes,
        &payload.payment_method,
        &payload.return_deadline,
        payload.rental_duration,
    )?;
    validate_optional_text(&payload.cancel_reason, "cancel_reason", MAX_NOTE_LEN)?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    let stored = booking_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("Booking {id}")))?;
    require_active(&stored)?;

    let customer = match &payload.customer {
        Some(customer_payload) => {
            let (customer, _) = resolver::resolve(&mut tx, customer_payload).await?;
            snapshot_of(&customer)
        }
        None => stored.customer.clone(),
    };

    // Full replacement semantics: absent items means "keep", which is a
    // recompute over the stored raw inputs.
    let mut inputs = match payload.items {
        Some(items) => items,
        None => stored.items.iter().map(BookingItemInput::from).collect(),
    };
    prefill_catalog_prices(&mut tx, &mut inputs).await?;
    let (items, totals) = recompute(&inputs)?;

    let now = now_millis();
    let mut updated = Booking {
        id: stored.id,
        customer,
        items,
        totals,
        status: BookingStatus::Active,
        canceled_at: None,
        cancel_reason: None,
        rental_duration: payload.rental_duration.or(stored.rental_duration),
        return_deadline: payload.return_deadline.or(stored.return_deadline.clone()),
        payment_method: payload.payment_method.or(stored.payment_method.clone()),
        notes: payload.notes.or(stored.notes.clone()),
        version: stored.version + 1,
        created_at: stored.created_at,
        updated_at: now,
    };

    // Same-request transition, applied after the update itself
    match payload.status {
        None | Some(BookingStatus::Active) => {}
        Some(BookingStatus::Completed) => {
            let completion_inputs = apply_completion(&updated.items);
            let (items, totals) = recompute(&completion_inputs)?;
            updated.items = items;
            updated.totals = totals;
            updated.status = BookingStatus::Completed;
        }
        Some(BookingStatus::Canceled) => {
            updated.status = BookingStatus::Canceled;
            updated.canceled_at = Some(now);
            updated.cancel_reason = payload.cancel_reason.clone();
        }
    }

    if !booking_repo::update_with_version(&mut *tx, &updated, stored.version).await? {
        return Err(LedgerError::ConcurrentModification);
    }

    // Net aggregate deltas against the contribution recorded at creation
    let old_customer_id = stored.customer.customer_id;
    let old_total = stored.totals.total_price;
    if updated.customer.customer_id == old_customer_id {
        match updated.status {
            BookingStatus::Active => {
                let delta = updated.totals.total_price - old_total;
                if delta != 0 {
                    customer_repo::apply_booking_aggregates(
                        &mut *tx,
                        old_customer_id,
                        0,
                        delta,
                        None,
                    )
                    .await?;
                }
            }
            BookingStatus::Completed => {
                let delta = updated.totals.total_price - old_total;
                customer_repo::apply_booking_aggregates(
                    &mut *tx,
                    old_customer_id,
                    0,
                    delta,
                    Some(now),
                )
                .await?;
            }
            BookingStatus::Canceled => {
                customer_repo::apply_booking_aggregates(
                    &mut *tx,
                    old_customer_id,
                    -1,
                    -old_total,
                    None,
                )
                .await?;
            }
        }
    } else {
        // Booking moved to a different customer: reverse the old
        // contribution, then record the new one (unless canceled)
        customer_repo::apply_booking_aggregates(&mut *tx, old_customer_id, -1, -old_total, None)
            .await?;
        if updated.status != BookingStatus::Canceled {
            customer_repo::apply_booking_aggregates(
                &mut *tx,
                updated.customer.customer_id,
                1,
                updated.totals.total_price,
                Some(now),
            )
            .await?;
        }
    }

    tx.commit().await.map_err(db_err)?;
    tracing::info!(
        booking_id = updated.id,
        status = ?updated.status,
        total_price = updated.totals.total_price,
        "Booking updated"
    );
    Ok(updated)
}

/// Complete a booking's payment: every item's final payment absorbs its
/// pending balance, then the booking transitions to `completed`.
///
/// This is the only transition permitted to mutate item payment fields
/// as a side effect of a status change.
pub async fn complete_booking_payment(pool: &SqlitePool, id: i64) -> LedgerResult<Booking> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let stored = booking_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("Booking {id}")))?;
    require_active(&stored)?;

    let inputs = apply_completion(&stored.items);
    let (items, totals) = recompute(&inputs)?;

    let now = now_millis();
    let mut completed = stored.clone();
    completed.items = items;
    completed.totals = totals;
    completed.status = BookingStatus::Completed;
    completed.version = stored.version + 1;
    completed.updated_at = now;

    if !booking_repo::update_with_version(&mut *tx, &completed, stored.version).await? {
        return Err(LedgerError::ConcurrentModification);
    }

    // total_price is untouched by completion, so the spent contribution
    // recorded at creation still stands; only the activity date moves.
    customer_repo::apply_booking_aggregates(
        &mut *tx,
        completed.customer.customer_id,
        0,
        0,
        Some(now),
    )
    .await?;

    tx.commit().await.map_err(db_err)?;
    tracing::info!(
        booking_id = completed.id,
        total_paid = completed.totals.total_paid,
        "Booking payment completed"
    );
    Ok(completed)
}

/// Cancel an active booking. The last computed totals are retained as a
/// historical snapshot; no recomputation occurs.
pub async fn cancel_booking(
    pool: &SqlitePool,
    id: i64,
    reason: Option<String>,
) -> LedgerResult<Booking> {
    validate_optional_text(&reason, "cancel_reason", MAX_NOTE_LEN)?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    let stored = booking_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("Booking {id}")))?;
    require_active(&stored)?;

    let now = now_millis();
    let mut canceled = stored.clone();
    canceled.status = BookingStatus::Canceled;
    canceled.canceled_at = Some(now);
    canceled.cancel_reason = reason;
    canceled.version = stored.version + 1;
    canceled.updated_at = now;

    if !booking_repo::update_with_version(&mut *tx, &canceled, stored.version).await? {
        return Err(LedgerError::ConcurrentModification);
    }

    // A canceled booking no longer contributes to the customer aggregates
    customer_repo::apply_booking_aggregates(
        &mut *tx,
        canceled.customer.customer_id,
        -1,
        -canceled.totals.total_price,
        None,
    )
    .await?;

    tx.commit().await.map_err(db_err)?;
    tracing::info!(
        booking_id = canceled.id,
        reason = canceled.cancel_reason.as_deref().unwrap_or(""),
        "Booking canceled"
    );
    Ok(canceled)
}

/// Load a booking or fail with `NotFound`.
pub async fn get_booking(pool: &SqlitePool, id: i64) -> LedgerResult<Booking> {
    booking_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("Booking {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use shared::models::CustomerPayload;

    fn customer(mobile: &str, name: &str) -> CustomerPayload {
        CustomerPayload {
            mobile: mobile.to_string(),
            name: name.to_string(),
            email: None,
            location: None,
            measurements: None,
            emergency_contact: None,
        }
    }

    /// Scenario pair used across tests: totals 7300 price / 5000 paid
    fn sample_items() -> Vec<BookingItemInput> {
        vec![
            BookingItemInput {
                original_price: Some(5000),
                price_after_bargain: Some(4500),
                booking_amount: Some(1000),
                advance: Some(2000),
                transport_cost: Some(200),
                dry_cleaning_cost: Some(400),
                additional_costs: vec![
                    shared::models::AdditionalCost {
                        reason: "alterations".to_string(),
                        amount: 300,
                    },
                    shared::models::AdditionalCost {
                        reason: "accessories".to_string(),
                        amount: 150,
                    },
                ],
                ..Default::default()
            },
            BookingItemInput {
                original_price: Some(2800),
                price_after_bargain: Some(2800),
                booking_amount: Some(2000),
                transport_cost: Some(250),
                dry_cleaning_cost: Some(400),
                ..Default::default()
            },
        ]
    }

    fn create_payload(mobile: &str, name: &str) -> BookingCreate {
        BookingCreate {
            customer: customer(mobile, name),
            items: sample_items(),
            rental_duration: Some(3),
            return_deadline: None,
            payment_method: Some("CASH".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_booking_computes_and_persists() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Active);
        assert_eq!(booking.version, 1);
        assert_eq!(booking.items.len(), 2);
        assert_eq!(booking.items[0].discount, 500);
        assert_eq!(booking.items[0].total_paid, 3000);
        assert_eq!(booking.items[0].pending, 1500);
        assert_eq!(booking.items[0].total_cost, 1050);
        assert_eq!(booking.items[0].profit, 1950);

        assert_eq!(booking.totals.total_price, 7300);
        assert_eq!(booking.totals.total_paid, 5000);
        assert_eq!(booking.totals.total_operational_cost, 1700);
        assert_eq!(booking.totals.gross_profit, -2300);
        assert_eq!(booking.totals.net_profit, -4000);

        // Stored record round-trips byte-identical
        let reloaded = get_booking(&pool, booking.id).await.unwrap();
        assert_eq!(reloaded, booking);

        // Creation contributed to the customer aggregates
        let c = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c.total_bookings, 1);
        assert_eq!(c.total_spent, 7300);
        assert!(c.last_booking_date.is_some());
    }

    #[tokio::test]
    async fn test_create_booking_rejects_empty_items() {
        let pool = test_pool().await;
        let mut payload = create_payload("612345678", "Ana");
        payload.items = vec![];
        let err = create_booking(&pool, payload).await.unwrap_err();
        assert!(matches!(err, LedgerError::EmptyBooking));

        // Nothing was persisted, not even the customer
        let found = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_create_booking_rejects_negative_amount() {
        let pool = test_pool().await;
        let mut payload = create_payload("612345678", "Ana");
        payload.items[0].repair_cost = Some(-300);
        let err = create_booking(&pool, payload).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "repair_cost"));
    }

    #[tokio::test]
    async fn test_create_booking_requires_customer_contact() {
        let pool = test_pool().await;
        let mut payload = create_payload("", "Ana");
        payload.customer.mobile = "no digits".to_string();
        let err = create_booking(&pool, payload).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "mobile"));
    }

    #[tokio::test]
    async fn test_create_booking_prefills_prices_from_catalog() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO product (id, name, price, is_active, created_at, updated_at) VALUES (42, 'Silk gown', 6000, 1, 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let mut payload = create_payload("612345678", "Ana");
        payload.items = vec![BookingItemInput {
            dress_id: Some(42),
            advance: Some(1000),
            ..Default::default()
        }];
        let booking = create_booking(&pool, payload).await.unwrap();

        assert_eq!(booking.items[0].original_price, 6000);
        assert_eq!(booking.items[0].price_after_bargain, 6000);
        assert_eq!(booking.items[0].pending, 5000);
    }

    #[tokio::test]
    async fn test_second_booking_same_mobile_reuses_customer() {
        let pool = test_pool().await;
        let first = create_booking(&pool, create_payload("9999999999", "Ana"))
            .await
            .unwrap();
        let second = create_booking(&pool, create_payload("9999999999", "Ana García"))
            .await
            .unwrap();

        assert_eq!(
            first.customer.customer_id,
            second.customer.customer_id
        );
        assert_eq!(second.customer.name, "Ana García");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        // Most recent payload wins on the stored record too
        let c = customer_repo::find_by_mobile(&pool, "9999999999")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c.name, "Ana García");
        assert_eq!(c.total_bookings, 2);
        assert_eq!(c.total_spent, 14600);
    }

    #[tokio::test]
    async fn test_update_replaces_item_list_and_adjusts_spent() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        let update = BookingUpdate {
            items: Some(vec![BookingItemInput {
                original_price: Some(2000),
                price_after_bargain: Some(2000),
                advance: Some(500),
                ..Default::default()
            }]),
            notes: Some("rescheduled".to_string()),
            ..Default::default()
        };
        let updated = update_booking(&pool, booking.id, update).await.unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.totals.total_price, 2000);
        assert_eq!(updated.totals.total_paid, 500);
        assert_eq!(updated.notes.as_deref(), Some("rescheduled"));
        // Absent pass-through fields keep their stored values
        assert_eq!(updated.payment_method.as_deref(), Some("CASH"));
        assert_eq!(updated.rental_duration, Some(3));

        let c = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c.total_bookings, 1);
        assert_eq!(c.total_spent, 2000);
    }

    #[tokio::test]
    async fn test_update_without_items_recomputes_stored_list() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        let updated = update_booking(
            &pool,
            booking.id,
            BookingUpdate {
                notes: Some("called to confirm".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.items, booking.items);
        assert_eq!(updated.totals, booking.totals);
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn test_complete_payment_drives_pending_to_zero() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        let completed = complete_booking_payment(&pool, booking.id).await.unwrap();

        assert_eq!(completed.status, BookingStatus::Completed);
        for (before, after) in booking.items.iter().zip(&completed.items) {
            assert_eq!(after.pending, 0);
            assert_eq!(after.final_payment, before.final_payment + before.pending);
        }
        assert_eq!(completed.totals.total_pending, 0);
        assert_eq!(
            completed.totals.total_paid,
            completed.totals.total_price
        );

        // Spent contribution from creation stands, only the date moves
        let c = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c.total_bookings, 1);
        assert_eq!(c.total_spent, 7300);
    }

    #[tokio::test]
    async fn test_terminal_states_reject_all_mutations() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();
        let completed = complete_booking_payment(&pool, booking.id).await.unwrap();

        let err = complete_booking_payment(&pool, booking.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition {
                from: BookingStatus::Completed
            }
        ));

        let err = update_booking(&pool, booking.id, BookingUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { .. }));

        let err = cancel_booking(&pool, booking.id, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { .. }));

        // Stored totals are untouched by the rejected attempts
        let reloaded = get_booking(&pool, booking.id).await.unwrap();
        assert_eq!(reloaded, completed);
    }

    #[tokio::test]
    async fn test_cancel_sets_fields_and_reverses_aggregates() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        let canceled = cancel_booking(&pool, booking.id, Some("customer request".to_string()))
            .await
            .unwrap();

        assert_eq!(canceled.status, BookingStatus::Canceled);
        assert!(canceled.canceled_at.is_some());
        assert_eq!(canceled.cancel_reason.as_deref(), Some("customer request"));
        // Totals retained as a historical snapshot
        assert_eq!(canceled.totals, booking.totals);
        assert_eq!(canceled.items, booking.items);

        let err = cancel_booking(&pool, booking.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition {
                from: BookingStatus::Canceled
            }
        ));

        let c = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c.total_bookings, 0);
        assert_eq!(c.total_spent, 0);
    }

    #[tokio::test]
    async fn test_update_with_same_request_completion() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        let updated = update_booking(
            &pool,
            booking.id,
            BookingUpdate {
                items: Some(vec![BookingItemInput {
                    price_after_bargain: Some(4000),
                    advance: Some(1500),
                    ..Default::default()
                }]),
                status: Some(BookingStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, BookingStatus::Completed);
        assert_eq!(updated.totals.total_pending, 0);
        assert_eq!(updated.totals.total_paid, 4000);
        assert_eq!(updated.items[0].final_payment, 2500);

        let c = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c.total_bookings, 1);
        assert_eq!(c.total_spent, 4000);
    }

    #[tokio::test]
    async fn test_update_with_same_request_cancellation() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        let updated = update_booking(
            &pool,
            booking.id,
            BookingUpdate {
                status: Some(BookingStatus::Canceled),
                cancel_reason: Some("double booked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, BookingStatus::Canceled);
        assert!(updated.canceled_at.is_some());
        assert_eq!(updated.cancel_reason.as_deref(), Some("double booked"));

        let c = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(c.total_bookings, 0);
        assert_eq!(c.total_spent, 0);
    }

    #[tokio::test]
    async fn test_update_moves_booking_to_other_customer() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        let updated = update_booking(
            &pool,
            booking.id,
            BookingUpdate {
                customer: Some(customer("700111222", "Berta")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.customer.mobile, "700111222");

        let ana = customer_repo::find_by_mobile(&pool, "612345678")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ana.total_bookings, 0);
        assert_eq!(ana.total_spent, 0);

        let berta = customer_repo::find_by_mobile(&pool, "700111222")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(berta.total_bookings, 1);
        assert_eq!(berta.total_spent, 7300);
    }

    #[tokio::test]
    async fn test_stale_version_write_is_rejected() {
        let pool = test_pool().await;
        let booking = create_booking(&pool, create_payload("612345678", "Ana"))
            .await
            .unwrap();

        // A writer holding a stale version must not win
        let mut stale = booking.clone();
        stale.version = booking.version + 1;
        stale.notes = Some("stale write".to_string());
        let wrote = booking_repo::update_with_version(&pool, &stale, 999)
            .await
            .unwrap();
        assert!(!wrote);

        let reloaded = get_booking(&pool, booking.id).await.unwrap();
        assert_eq!(reloaded.notes, None);
        assert_eq!(reloaded.version, booking.version);
    }

    #[tokio::test]
    async fn test_get_booking_not_found() {
        let pool = test_pool().await;
        let err = get_booking(&pool, 12345).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}
