//! Ledger domain module.
//!
//! This crate contains the business rules for the cash ledger and warehouse,
//! implemented purely as deterministic domain logic (no IO, no prompts, no
//! storage).

pub mod error;
pub mod input;
pub mod ledger;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{
    AdjustBalance, BalanceAdjusted, Ledger, LedgerCommand, LedgerEvent, PurchaseRecorded,
    RecordPurchase, RecordSale, SaleRecorded, StockRecord, Warehouse,
};
