//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level error.
///
/// Keep this focused on deterministic rejections (malformed input, business
/// rules). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    /// A balance adjustment amount failed to parse.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// A price or quantity field failed to parse.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// A history index failed to parse.
    #[error("invalid index: {0:?}")]
    InvalidIndex(String),

    /// A history range was out of bounds or inverted.
    #[error("invalid history range: [{start}, {end}) over {len} entries")]
    InvalidRange { start: i64, end: i64, len: usize },

    /// A sale requested more units than the warehouse holds.
    #[error("not enough stock of {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: u64,
        requested: u64,
    },

    /// A purchase total exceeded the current balance.
    #[error("insufficient funds: required {required}, balance {balance}")]
    InsufficientFunds { required: f64, balance: f64 },
}

impl LedgerError {
    pub fn insufficient_stock(product: impl Into<String>, available: u64, requested: u64) -> Self {
        Self::InsufficientStock {
            product: product.into(),
            available,
            requested,
        }
    }

    pub fn insufficient_funds(required: f64, balance: f64) -> Self {
        Self::InsufficientFunds { required, balance }
    }
}
