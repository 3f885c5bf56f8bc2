//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! at the engine boundary.

use crate::ledger::error::{LedgerError, LedgerResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, product, cost reason, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons (cancel reason, booking notes, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: mobile, payment method, measurements, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &'static str, max_len: usize) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::validation(field, "must not be empty"));
    }
    if value.len() > max_len {
        return Err(LedgerError::validation(
            field,
            format!("is too long ({} chars, max {max_len})", value.len()),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &'static str,
    max_len: usize,
) -> LedgerResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(LedgerError::validation(
            field,
            format!("is too long ({} chars, max {max_len})", v.len()),
        ));
    }
    Ok(())
}
