//! State persistence for the ledger.
//!
//! Each of the three entities (balance, warehouse, operation history) lives in
//! its own JSON file. Loading substitutes a type-appropriate default for any
//! entity that is absent or unreadable; saving attempts every entity even when
//! one of them fails. Persistence problems are diagnostics, never fatal.

pub mod paths;
pub mod store;

pub use paths::StorePaths;
pub use store::{StateStore, StoreError};
