//! Booking models - aggregate root, items and derived totals
//!
//! All monetary values are non-negative integers in minor currency units.
//! Derived fields (`discount`, `total_paid`, `pending`, `total_cost`,
//! `profit` and every booking rollup) are computed by the ledger engine
//! and are never accepted from a caller.

use serde::{Deserialize, Serialize};

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Active,
    Completed,
    Canceled,
}

impl BookingStatus {
    /// Completed and canceled bookings accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Canceled)
    }
}

/// Per-item lifecycle state. Informational only - not transition-guarded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Booked,
    Paid,
    Sent,
    Delivered,
    InUse,
    Returned,
    Processing,
    Completed,
    Damaged,
    Lost,
}

/// One extra operational cost line on an item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdditionalCost {
    pub reason: String,
    pub amount: i64,
}

/// Raw item payload as supplied by a caller.
///
/// Missing numeric fields are treated as 0 by the calculator; negative
/// values are rejected at validation, never clamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingItemInput {
    /// Catalog product reference (external collaborator)
    pub dress_id: Option<i64>,
    pub original_price: Option<i64>,
    pub price_after_bargain: Option<i64>,
    pub booking_amount: Option<i64>,
    pub advance: Option<i64>,
    pub final_payment: Option<i64>,
    /// Refundable deposit - excluded from profit/cost math
    pub security_amount: Option<i64>,
    pub transport_cost: Option<i64>,
    pub dry_cleaning_cost: Option<i64>,
    pub repair_cost: Option<i64>,
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCost>,
    pub status: Option<ItemStatus>,
    // Timeline fields are opaque calendar dates, not validated for ordering
    pub booking_date: Option<String>,
    pub send_date: Option<String>,
    pub receive_date: Option<String>,
    pub use_dress_date: Option<String>,
}

/// Computed item snapshot - raw inputs plus derived fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingItem {
    pub dress_id: Option<i64>,
    pub original_price: i64,
    pub price_after_bargain: i64,
    /// Derived: max(0, original_price - price_after_bargain)
    pub discount: i64,
    pub booking_amount: i64,
    pub advance: i64,
    pub final_payment: i64,
    /// Derived: booking_amount + advance + final_payment
    pub total_paid: i64,
    /// Derived: max(0, price_after_bargain - total_paid)
    pub pending: i64,
    pub security_amount: i64,
    pub additional_costs: Vec<AdditionalCost>,
    /// Derived: sum of additional cost amounts
    pub additional_costs_total: i64,
    pub transport_cost: i64,
    pub dry_cleaning_cost: i64,
    pub repair_cost: i64,
    /// Derived: transport + dry cleaning + repair + additional costs
    pub total_cost: i64,
    /// Derived: total_paid - total_cost (may be negative)
    pub profit: i64,
    pub status: ItemStatus,
    pub booking_date: Option<String>,
    pub send_date: Option<String>,
    pub receive_date: Option<String>,
    pub use_dress_date: Option<String>,
}

impl From<&BookingItem> for BookingItemInput {
    /// Project a stored item back onto its raw inputs, discarding every
    /// derived field. Recomputation always starts from this view so
    /// derived state is never accumulated onto derived state.
    fn from(item: &BookingItem) -> Self {
        Self {
            dress_id: item.dress_id,
            original_price: Some(item.original_price),
            price_after_bargain: Some(item.price_after_bargain),
            booking_amount: Some(item.booking_amount),
            advance: Some(item.advance),
            final_payment: Some(item.final_payment),
            security_amount: Some(item.security_amount),
            transport_cost: Some(item.transport_cost),
            dry_cleaning_cost: Some(item.dry_cleaning_cost),
            repair_cost: Some(item.repair_cost),
            additional_costs: item.additional_costs.clone(),
            status: Some(item.status),
            booking_date: item.booking_date.clone(),
            send_date: item.send_date.clone(),
            receive_date: item.receive_date.clone(),
            use_dress_date: item.use_dress_date.clone(),
        }
    }
}

/// Booking-level rollups. All derived, recomputed on every mutation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingTotals {
    pub total_price: i64,
    pub total_paid: i64,
    pub total_pending: i64,
    pub total_security: i64,
    pub total_transport_cost: i64,
    pub total_dry_cleaning_cost: i64,
    pub total_repair_cost: i64,
    pub total_operational_cost: i64,
    pub gross_profit: i64,
    pub net_profit: i64,
}

/// Denormalized customer snapshot embedded in a booking, plus the
/// back-reference to the canonical customer record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerSnapshot {
    pub customer_id: i64,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub location: Option<String>,
}

/// Booking aggregate root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub customer: CustomerSnapshot,
    /// Non-empty by invariant
    pub items: Vec<BookingItem>,
    #[serde(flatten)]
    pub totals: BookingTotals,
    pub status: BookingStatus,
    /// Set only on cancellation
    pub canceled_at: Option<i64>,
    pub cancel_reason: Option<String>,
    // Pass-through fields, never recomputed
    pub rental_duration: Option<i64>,
    pub return_deadline: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    /// Optimistic concurrency token, incremented on every write
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == BookingStatus::Completed
    }

    pub fn is_canceled(&self) -> bool {
        self.status == BookingStatus::Canceled
    }
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub customer: super::CustomerPayload,
    #[serde(default)]
    pub items: Vec<BookingItemInput>,
    pub rental_duration: Option<i64>,
    pub return_deadline: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Update booking payload.
///
/// `items`, when present, is the complete replacement list - partial item
/// edits are not merged. `status` requests a transition in the same
/// request; absent means the booking stays active.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub customer: Option<super::CustomerPayload>,
    pub items: Option<Vec<BookingItemInput>>,
    pub status: Option<BookingStatus>,
    pub cancel_reason: Option<String>,
    pub rental_duration: Option<i64>,
    pub return_deadline: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}
