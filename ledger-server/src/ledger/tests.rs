//! Calculator and aggregator unit tests

use super::aggregator::{aggregate, recompute};
use super::calculator::{MAX_AMOUNT, compute_item, validate_item, validate_items};
use super::error::LedgerError;
use shared::models::{AdditionalCost, BookingItemInput, ItemStatus};

fn extra(amount: i64) -> AdditionalCost {
    AdditionalCost {
        reason: "extra".to_string(),
        amount,
    }
}

/// Worked example: dress listed at 5000, bargained to 4500, partly paid,
/// with transport/cleaning and two additional cost lines.
fn sample_item() -> BookingItemInput {
    BookingItemInput {
        original_price: Some(5000),
        price_after_bargain: Some(4500),
        booking_amount: Some(1000),
        advance: Some(2000),
        final_payment: Some(0),
        transport_cost: Some(200),
        dry_cleaning_cost: Some(400),
        repair_cost: Some(0),
        additional_costs: vec![extra(300), extra(150)],
        ..Default::default()
    }
}

#[test]
fn test_compute_item_derives_all_fields() {
    let item = compute_item(&sample_item());
    assert_eq!(item.discount, 500);
    assert_eq!(item.total_paid, 3000);
    assert_eq!(item.pending, 1500);
    assert_eq!(item.additional_costs_total, 450);
    assert_eq!(item.total_cost, 1050);
    assert_eq!(item.profit, 1950);
    assert_eq!(item.status, ItemStatus::Booked);
}

#[test]
fn test_compute_item_defaults_missing_fields_to_zero() {
    let item = compute_item(&BookingItemInput::default());
    assert_eq!(item.original_price, 0);
    assert_eq!(item.price_after_bargain, 0);
    assert_eq!(item.discount, 0);
    assert_eq!(item.total_paid, 0);
    assert_eq!(item.pending, 0);
    assert_eq!(item.total_cost, 0);
    assert_eq!(item.profit, 0);
}

#[test]
fn test_discount_clamps_when_bargain_exceeds_list_price() {
    let input = BookingItemInput {
        original_price: Some(3000),
        price_after_bargain: Some(3500),
        ..Default::default()
    };
    assert_eq!(compute_item(&input).discount, 0);
}

#[test]
fn test_pending_clamps_on_overpayment() {
    let input = BookingItemInput {
        price_after_bargain: Some(1000),
        booking_amount: Some(800),
        advance: Some(500),
        ..Default::default()
    };
    let item = compute_item(&input);
    assert_eq!(item.total_paid, 1300);
    assert_eq!(item.pending, 0);
}

#[test]
fn test_comped_rental_with_zero_price_is_legal() {
    let input = BookingItemInput {
        original_price: Some(5000),
        price_after_bargain: Some(0),
        ..Default::default()
    };
    let item = compute_item(&input);
    assert_eq!(item.pending, 0);
    assert_eq!(item.discount, 5000);
}

#[test]
fn test_profit_may_be_negative() {
    let input = BookingItemInput {
        price_after_bargain: Some(1000),
        booking_amount: Some(1000),
        repair_cost: Some(2500),
        ..Default::default()
    };
    assert_eq!(compute_item(&input).profit, -1500);
}

#[test]
fn test_recompute_is_idempotent() {
    let inputs = vec![sample_item(), BookingItemInput::default()];
    let (items_a, totals_a) = recompute(&inputs).unwrap();

    // Project the computed items back to raw inputs and run again:
    // derived state must never accumulate onto derived state.
    let reprojected: Vec<BookingItemInput> =
        items_a.iter().map(BookingItemInput::from).collect();
    let (items_b, totals_b) = recompute(&reprojected).unwrap();

    assert_eq!(items_a, items_b);
    assert_eq!(totals_a, totals_b);
}

#[test]
fn test_validate_item_rejects_negative_amounts() {
    let input = BookingItemInput {
        advance: Some(-1),
        ..Default::default()
    };
    let err = validate_item(&input).unwrap_err();
    assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "advance"));

    let input = BookingItemInput {
        additional_costs: vec![extra(-50)],
        ..Default::default()
    };
    let err = validate_item(&input).unwrap_err();
    assert!(
        matches!(err, LedgerError::Validation { ref field, .. } if field == "additional_costs.amount")
    );
}

#[test]
fn test_validate_item_rejects_amounts_over_cap() {
    let input = BookingItemInput {
        original_price: Some(MAX_AMOUNT + 1),
        ..Default::default()
    };
    let err = validate_item(&input).unwrap_err();
    assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "original_price"));
}

#[test]
fn test_validate_items_rejects_empty_list() {
    let err = validate_items(&[]).unwrap_err();
    assert!(matches!(err, LedgerError::EmptyBooking));
}

#[test]
fn test_aggregate_rejects_empty_list() {
    let err = aggregate(&[]).unwrap_err();
    assert!(matches!(err, LedgerError::EmptyBooking));
}

/// Second worked example: two items rolled up into booking totals.
#[test]
fn test_aggregate_two_items() {
    let second = BookingItemInput {
        original_price: Some(2800),
        price_after_bargain: Some(2800),
        booking_amount: Some(2000),
        transport_cost: Some(250),
        dry_cleaning_cost: Some(400),
        ..Default::default()
    };
    let (items, totals) = recompute(&[sample_item(), second]).unwrap();

    assert_eq!(items[1].total_paid, 2000);
    assert_eq!(items[1].total_cost, 650);

    assert_eq!(totals.total_price, 7300);
    assert_eq!(totals.total_paid, 5000);
    assert_eq!(totals.total_pending, 2300);
    assert_eq!(totals.total_operational_cost, 1700);
    assert_eq!(totals.gross_profit, -2300);
    assert_eq!(totals.net_profit, -4000);
}

#[test]
fn test_aggregate_additivity_and_profit_identity() {
    let inputs = vec![
        sample_item(),
        BookingItemInput {
            price_after_bargain: Some(1200),
            advance: Some(1200),
            security_amount: Some(500),
            repair_cost: Some(80),
            ..Default::default()
        },
        BookingItemInput {
            original_price: Some(900),
            price_after_bargain: Some(700),
            final_payment: Some(900),
            ..Default::default()
        },
    ];
    let (items, totals) = recompute(&inputs).unwrap();

    let price_sum: i64 = items.iter().map(|i| i.price_after_bargain).sum();
    let paid_sum: i64 = items.iter().map(|i| i.total_paid).sum();
    let pending_sum: i64 = items.iter().map(|i| i.pending).sum();
    let security_sum: i64 = items.iter().map(|i| i.security_amount).sum();
    let cost_sum: i64 = items.iter().map(|i| i.total_cost).sum();

    assert_eq!(totals.total_price, price_sum);
    assert_eq!(totals.total_paid, paid_sum);
    assert_eq!(totals.total_pending, pending_sum);
    assert_eq!(totals.total_security, security_sum);
    assert_eq!(totals.total_operational_cost, cost_sum);

    // net_profit = total_paid - total_price - total_operational_cost
    assert_eq!(
        totals.net_profit,
        totals.total_paid - totals.total_price - totals.total_operational_cost
    );
}

#[test]
fn test_aggregate_single_item_equals_item_fields() {
    let (items, totals) = recompute(&[sample_item()]).unwrap();
    assert_eq!(totals.total_price, items[0].price_after_bargain);
    assert_eq!(totals.total_paid, items[0].total_paid);
    assert_eq!(totals.total_pending, items[0].pending);
    assert_eq!(totals.total_operational_cost, items[0].total_cost);
}
