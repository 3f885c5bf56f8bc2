//! Booking Ledger & Aggregation Engine
//!
//! Keeps the derived financial fields of a booking continuously
//! consistent with the raw inputs a user edits:
//!
//! - **calculator**: per-item derivation (discount, payments, costs, profit)
//! - **aggregator**: booking-level rollups and profit figures
//! - **resolver**: customer matching/merging by normalized mobile number
//! - **workflow**: lifecycle state machine and atomic persistence
//!
//! # Data Flow
//!
//! ```text
//! Write request (customer payload + item payloads)
//!       ↓
//! Resolver → customer id        Calculator → computed items
//!       ↓                             ↓
//!            Aggregator → booking totals
//!                     ↓
//!        Workflow → transition check → atomic write
//! ```
//!
//! All callers (creation, update, completion) route through the same
//! calculator and aggregator; no arithmetic is duplicated elsewhere.

pub mod aggregator;
pub mod calculator;
pub mod error;
pub mod resolver;
pub mod workflow;

pub use error::{LedgerError, LedgerResult};

#[cfg(test)]
mod tests;
