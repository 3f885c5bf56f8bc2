//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity - one record per distinct normalized mobile number.
///
/// `total_bookings`, `total_spent` and `last_booking_date` are running
/// aggregates maintained by the booking workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    /// Normalized mobile number (digits only) - the dedup key
    pub mobile: String,
    pub name: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub measurements: Option<String>,
    pub emergency_contact: Option<String>,
    pub total_bookings: i64,
    pub total_spent: i64,
    pub last_booking_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Inbound customer payload carried on a booking write.
///
/// `mobile` and `name` are required; the remaining contact fields follow
/// non-destructive merge semantics (absent keeps the stored value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub mobile: String,
    pub name: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub measurements: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Partial update applied to an existing customer during resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub measurements: Option<String>,
    pub emergency_contact: Option<String>,
}
