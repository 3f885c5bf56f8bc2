//! Shared domain models for the booking ledger.
//!
//! This crate holds the types that cross crate boundaries: booking and
//! customer models, their create/update payloads, and small utilities
//! (timestamps, ID generation). It stays free of I/O so it can be used
//! by the server and by any future client tooling.

pub mod models;
pub mod util;

pub use models::{
    AdditionalCost, Booking, BookingCreate, BookingItem, BookingItemInput, BookingStatus,
    BookingTotals, BookingUpdate, Customer, CustomerPayload, CustomerSnapshot, CustomerUpdate,
    ItemStatus, Product,
};
