//! Explicit validation for raw numeric fields.
//!
//! Every interactive field goes through one of these functions so command
//! handlers see either a typed value or a specific rejection reason, never a
//! raw string.

use crate::error::{LedgerError, LedgerResult};

/// Parse a signed decimal balance adjustment.
pub fn parse_amount(raw: &str) -> LedgerResult<f64> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .map_err(|_| LedgerError::InvalidAmount(raw.to_string()))
}

/// Parse a unit price.
pub fn parse_price(raw: &str) -> LedgerResult<f64> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .map_err(|_| LedgerError::InvalidNumber(raw.to_string()))
}

/// Parse a unit quantity. Negative quantities are rejected here.
pub fn parse_quantity(raw: &str) -> LedgerResult<u64> {
    let raw = raw.trim();
    raw.parse::<u64>()
        .map_err(|_| LedgerError::InvalidNumber(raw.to_string()))
}

/// Parse a history index, substituting `default` when the field is blank.
pub fn parse_index(raw: &str, default: i64) -> LedgerResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse::<i64>()
        .map_err(|_| LedgerError::InvalidIndex(raw.to_string()))
}
