//! Booking Aggregator - folds computed items into booking-level totals

use super::calculator::compute_item;
use super::error::{LedgerError, LedgerResult};
use shared::models::{BookingItem, BookingItemInput, BookingTotals};

/// Fold a list of computed items into booking rollups.
///
/// Pure. Summation is elementwise and commutative; i64 accumulators give
/// no silent overflow for currency magnitudes. An empty list is always a
/// failure, never zero totals.
pub fn aggregate(items: &[BookingItem]) -> LedgerResult<BookingTotals> {
    if items.is_empty() {
        return Err(LedgerError::EmptyBooking);
    }

    let mut totals = BookingTotals::default();
    for item in items {
        totals.total_price += item.price_after_bargain;
        totals.total_paid += item.total_paid;
        totals.total_pending += item.pending;
        totals.total_security += item.security_amount;
        totals.total_transport_cost += item.transport_cost;
        totals.total_dry_cleaning_cost += item.dry_cleaning_cost;
        totals.total_repair_cost += item.repair_cost;
        totals.total_operational_cost += item.total_cost;
    }
    totals.gross_profit = totals.total_paid - totals.total_price;
    totals.net_profit = totals.gross_profit - totals.total_operational_cost;

    Ok(totals)
}

/// Run the full recompute pipeline over raw inputs: compute every item,
/// then aggregate. Single entry point for all mutations so creation,
/// update and completion can never drift apart arithmetically.
pub fn recompute(inputs: &[BookingItemInput]) -> LedgerResult<(Vec<BookingItem>, BookingTotals)> {
    let items: Vec<BookingItem> = inputs.iter().map(compute_item).collect();
    let totals = aggregate(&items)?;
    Ok((items, totals))
}
