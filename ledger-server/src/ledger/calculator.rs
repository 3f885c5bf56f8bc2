//! Item Calculator - derives per-item financial fields from raw inputs
//!
//! All amounts are integers in minor currency units, so the arithmetic
//! here is plain i64. `compute_item` is a total function: missing inputs
//! default to 0 and the result carries every derived field. Negative raw
//! inputs are rejected at the validation boundary, never clamped.

use super::error::{LedgerError, LedgerResult};
use shared::models::{BookingItem, BookingItemInput};

/// Maximum allowed value for any single monetary input (minor units)
pub const MAX_AMOUNT: i64 = 100_000_000;

/// Maximum number of items per booking
pub const MAX_ITEMS: usize = 200;

/// Maximum number of additional cost lines per item
pub const MAX_ADDITIONAL_COSTS: usize = 50;

#[inline]
fn require_amount(value: Option<i64>, field: &'static str) -> LedgerResult<()> {
    let v = value.unwrap_or(0);
    if v < 0 {
        return Err(LedgerError::validation(
            field,
            format!("must be non-negative, got {v}"),
        ));
    }
    if v > MAX_AMOUNT {
        return Err(LedgerError::validation(
            field,
            format!("exceeds maximum allowed ({MAX_AMOUNT}), got {v}"),
        ));
    }
    Ok(())
}

/// Validate a raw item payload before computation
pub fn validate_item(item: &BookingItemInput) -> LedgerResult<()> {
    require_amount(item.original_price, "original_price")?;
    require_amount(item.price_after_bargain, "price_after_bargain")?;
    require_amount(item.booking_amount, "booking_amount")?;
    require_amount(item.advance, "advance")?;
    require_amount(item.final_payment, "final_payment")?;
    require_amount(item.security_amount, "security_amount")?;
    require_amount(item.transport_cost, "transport_cost")?;
    require_amount(item.dry_cleaning_cost, "dry_cleaning_cost")?;
    require_amount(item.repair_cost, "repair_cost")?;

    if item.additional_costs.len() > MAX_ADDITIONAL_COSTS {
        return Err(LedgerError::validation(
            "additional_costs",
            format!(
                "too many cost lines ({}, max {MAX_ADDITIONAL_COSTS})",
                item.additional_costs.len()
            ),
        ));
    }
    for cost in &item.additional_costs {
        require_amount(Some(cost.amount), "additional_costs.amount")?;
    }

    Ok(())
}

/// Validate a full item list (booking-level boundary)
pub fn validate_items(items: &[BookingItemInput]) -> LedgerResult<()> {
    if items.is_empty() {
        return Err(LedgerError::EmptyBooking);
    }
    if items.len() > MAX_ITEMS {
        return Err(LedgerError::validation(
            "items",
            format!("too many items ({}, max {MAX_ITEMS})", items.len()),
        ));
    }
    for item in items {
        validate_item(item)?;
    }
    Ok(())
}

/// Compute one item's derived fields from its raw inputs.
///
/// Pure and total. Later steps depend on earlier results within the same
/// call; nothing is read from previously derived state, so recomputation
/// over the same raw inputs is byte-identical.
pub fn compute_item(input: &BookingItemInput) -> BookingItem {
    let original_price = input.original_price.unwrap_or(0);
    let price_after_bargain = input.price_after_bargain.unwrap_or(0);
    let booking_amount = input.booking_amount.unwrap_or(0);
    let advance = input.advance.unwrap_or(0);
    let final_payment = input.final_payment.unwrap_or(0);

    // 1. Discount is clamped: a bargain above list price is not a
    //    negative discount.
    let discount = (original_price - price_after_bargain).max(0);

    // 2-3. Payments. Pending clamps at zero; overpayment is absorbed.
    let total_paid = booking_amount + advance + final_payment;
    let pending = (price_after_bargain - total_paid).max(0);

    // 4-5. Operational costs. Security deposit is excluded.
    let transport_cost = input.transport_cost.unwrap_or(0);
    let dry_cleaning_cost = input.dry_cleaning_cost.unwrap_or(0);
    let repair_cost = input.repair_cost.unwrap_or(0);
    let additional_costs_total: i64 = input.additional_costs.iter().map(|c| c.amount).sum();
    let total_cost = transport_cost + dry_cleaning_cost + repair_cost + additional_costs_total;

    // 6. Profit is unclamped - a loss on the item stays visible.
    let profit = total_paid - total_cost;

    BookingItem {
        dress_id: input.dress_id,
        original_price,
        price_after_bargain,
        discount,
        booking_amount,
        advance,
        final_payment,
        total_paid,
        pending,
        security_amount: input.security_amount.unwrap_or(0),
        additional_costs: input.additional_costs.clone(),
        additional_costs_total,
        transport_cost,
        dry_cleaning_cost,
        repair_cost,
        total_cost,
        profit,
        status: input.status.unwrap_or_default(),
        booking_date: input.booking_date.clone(),
        send_date: input.send_date.clone(),
        receive_date: input.receive_date.clone(),
        use_dress_date: input.use_dress_date.clone(),
    }
}
