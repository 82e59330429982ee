use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Per-product stored price and quantity.
///
/// The price is the unit price of the most recent purchase; sales never touch
/// it. Quantity is unsigned so a negative stock level is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub price: f64,
    pub quantity: u64,
}

/// Warehouse mapping: product name -> stock record.
///
/// `BTreeMap` keeps listing and serialization order deterministic.
pub type Warehouse = BTreeMap<String, StockRecord>;

/// The in-memory triple of balance, warehouse, and operation history.
///
/// State evolves only through [`Ledger::apply`]; decisions are made by
/// [`Ledger::handle`], which borrows immutably so a rejected command cannot
/// mutate anything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    balance: f64,
    warehouse: Warehouse,
    operations: Vec<String>,
}

impl Ledger {
    /// Zero balance, empty warehouse, empty history.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from independently persisted entities.
    pub fn from_parts(balance: f64, warehouse: Warehouse, operations: Vec<String>) -> Self {
        Self {
            balance,
            warehouse,
            operations,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn record(&self, product: &str) -> Option<&StockRecord> {
        self.warehouse.get(product)
    }

    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn history_len(&self) -> usize {
        self.operations.len()
    }
}

/// Command: AdjustBalance.
///
/// Direct adjustments may drive the balance negative; only purchases guard
/// against overdraft. That asymmetry is part of the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustBalance {
    pub amount: f64,
}

/// Command: RecordSale.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSale {
    pub product: String,
    pub unit_price: f64,
    pub quantity: u64,
}

/// Command: RecordPurchase.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPurchase {
    pub product: String,
    pub unit_price: f64,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    AdjustBalance(AdjustBalance),
    RecordSale(RecordSale),
    RecordPurchase(RecordPurchase),
}

/// Event: BalanceAdjusted.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceAdjusted {
    pub amount: f64,
    pub new_balance: f64,
}

/// Event: SaleRecorded.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecorded {
    pub product: String,
    pub unit_price: f64,
    pub quantity: u64,
    pub total: f64,
}

/// Event: PurchaseRecorded.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRecorded {
    pub product: String,
    pub unit_price: f64,
    pub quantity: u64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    BalanceAdjusted(BalanceAdjusted),
    SaleRecorded(SaleRecorded),
    PurchaseRecorded(PurchaseRecorded),
}

/// An event renders as exactly the history entry it leaves behind.
impl core::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedgerEvent::BalanceAdjusted(e) => write!(
                f,
                "Balance changed by {}, new balance: {}",
                e.amount, e.new_balance
            ),
            LedgerEvent::SaleRecorded(e) => write!(
                f,
                "Sold {} of {} at {} each. Total: {}",
                e.quantity, e.product, e.unit_price, e.total
            ),
            LedgerEvent::PurchaseRecorded(e) => write!(
                f,
                "Purchased {} of {} at {} each. Total: {}",
                e.quantity, e.product, e.unit_price, e.total
            ),
        }
    }
}

impl Ledger {
    /// Decide which event a command produces given the current state.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    pub fn handle(&self, command: &LedgerCommand) -> LedgerResult<LedgerEvent> {
        match command {
            LedgerCommand::AdjustBalance(cmd) => {
                Ok(LedgerEvent::BalanceAdjusted(BalanceAdjusted {
                    amount: cmd.amount,
                    new_balance: self.balance + cmd.amount,
                }))
            }
            LedgerCommand::RecordSale(cmd) => self.handle_sale(cmd),
            LedgerCommand::RecordPurchase(cmd) => self.handle_purchase(cmd),
        }
    }

    /// Evolve in-memory state from a single event and append its history
    /// entry. History entries are immutable once appended.
    pub fn apply(&mut self, event: &LedgerEvent) {
        match event {
            LedgerEvent::BalanceAdjusted(e) => {
                self.balance += e.amount;
            }
            LedgerEvent::SaleRecorded(e) => {
                self.balance += e.total;
                if let Some(record) = self.warehouse.get_mut(&e.product) {
                    // Events come from `handle`, which checked availability.
                    record.quantity = record.quantity.saturating_sub(e.quantity);
                }
            }
            LedgerEvent::PurchaseRecorded(e) => {
                self.balance -= e.total;
                let record = self.warehouse.entry(e.product.clone()).or_insert(StockRecord {
                    price: e.unit_price,
                    quantity: 0,
                });
                record.quantity += e.quantity;
                record.price = e.unit_price;
            }
        }
        self.operations.push(event.to_string());
    }

    /// `handle` then `apply`: a rejection leaves the ledger untouched.
    pub fn execute(&mut self, command: &LedgerCommand) -> LedgerResult<LedgerEvent> {
        let event = self.handle(command)?;
        self.apply(&event);
        Ok(event)
    }

    /// History entries in `[start, end)`, in append order.
    pub fn review(&self, start: i64, end: i64) -> LedgerResult<&[String]> {
        let len = self.operations.len();
        if start < 0 || end > len as i64 || start > end {
            return Err(LedgerError::InvalidRange { start, end, len });
        }
        Ok(&self.operations[start as usize..end as usize])
    }

    fn handle_sale(&self, cmd: &RecordSale) -> LedgerResult<LedgerEvent> {
        // An unknown product is rejected even for a zero-quantity sale.
        let Some(record) = self.warehouse.get(&cmd.product) else {
            return Err(LedgerError::insufficient_stock(&cmd.product, 0, cmd.quantity));
        };
        if record.quantity < cmd.quantity {
            return Err(LedgerError::insufficient_stock(
                &cmd.product,
                record.quantity,
                cmd.quantity,
            ));
        }
        let total = cmd.unit_price * cmd.quantity as f64;
        Ok(LedgerEvent::SaleRecorded(SaleRecorded {
            product: cmd.product.clone(),
            unit_price: cmd.unit_price,
            quantity: cmd.quantity,
            total,
        }))
    }

    fn handle_purchase(&self, cmd: &RecordPurchase) -> LedgerResult<LedgerEvent> {
        let total = cmd.unit_price * cmd.quantity as f64;
        // Equality is accepted: the balance may reach exactly zero.
        if total > self.balance {
            return Err(LedgerError::insufficient_funds(total, self.balance));
        }
        Ok(LedgerEvent::PurchaseRecorded(PurchaseRecorded {
            product: cmd.product.clone(),
            unit_price: cmd.unit_price,
            quantity: cmd.quantity,
            total,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn adjust(amount: f64) -> LedgerCommand {
        LedgerCommand::AdjustBalance(AdjustBalance { amount })
    }

    fn sale(product: &str, unit_price: f64, quantity: u64) -> LedgerCommand {
        LedgerCommand::RecordSale(RecordSale {
            product: product.to_string(),
            unit_price,
            quantity,
        })
    }

    fn purchase(product: &str, unit_price: f64, quantity: u64) -> LedgerCommand {
        LedgerCommand::RecordPurchase(RecordPurchase {
            product: product.to_string(),
            unit_price,
            quantity,
        })
    }

    #[test]
    fn adjust_balance_records_history_entry() {
        let mut ledger = Ledger::empty();
        let event = ledger.execute(&adjust(100.0)).unwrap();

        assert_eq!(ledger.balance(), 100.0);
        assert_eq!(
            event.to_string(),
            "Balance changed by 100, new balance: 100"
        );
        assert_eq!(ledger.operations(), [event.to_string()]);
    }

    #[test]
    fn adjust_balance_may_go_negative() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(-25.0)).unwrap();
        assert_eq!(ledger.balance(), -25.0);
    }

    #[test]
    fn purchase_creates_record_and_debits_balance() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(50.0)).unwrap();
        ledger.execute(&purchase("widget", 10.0, 5)).unwrap();

        assert_eq!(ledger.balance(), 0.0);
        assert_eq!(
            ledger.record("widget"),
            Some(&StockRecord {
                price: 10.0,
                quantity: 5,
            })
        );
    }

    #[test]
    fn purchase_accumulates_quantity_and_replaces_price() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(100.0)).unwrap();
        ledger.execute(&purchase("widget", 10.0, 5)).unwrap();
        ledger.execute(&purchase("widget", 12.0, 2)).unwrap();

        let record = ledger.record("widget").unwrap();
        assert_eq!(record.quantity, 7);
        assert_eq!(record.price, 12.0);
        assert_eq!(ledger.balance(), 100.0 - 50.0 - 24.0);
    }

    #[test]
    fn purchase_exceeding_balance_is_rejected_without_mutation() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(100.0)).unwrap();
        let before = ledger.clone();

        let err = ledger.execute(&purchase("gadget", 200.0, 1)).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_funds(200.0, 100.0));
        assert_eq!(ledger, before);
    }

    #[test]
    fn purchase_spending_exact_balance_is_accepted() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(30.0)).unwrap();
        ledger.execute(&purchase("widget", 10.0, 3)).unwrap();
        assert_eq!(ledger.balance(), 0.0);
    }

    #[test]
    fn sale_credits_balance_and_decrements_stock_only() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(50.0)).unwrap();
        ledger.execute(&purchase("widget", 10.0, 5)).unwrap();
        ledger.execute(&sale("widget", 15.0, 3)).unwrap();

        assert_eq!(ledger.balance(), 45.0);
        let record = ledger.record("widget").unwrap();
        assert_eq!(record.quantity, 2);
        // The recorded price reflects the last purchase, not the sale.
        assert_eq!(record.price, 10.0);
    }

    #[test]
    fn sale_of_unknown_product_is_rejected_without_mutation() {
        let mut ledger = Ledger::empty();
        let before = ledger.clone();

        let err = ledger.execute(&sale("widget", 5.0, 1)).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_stock("widget", 0, 1));
        assert_eq!(ledger, before);
    }

    #[test]
    fn sale_exceeding_stock_is_rejected_without_mutation() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(50.0)).unwrap();
        ledger.execute(&purchase("widget", 10.0, 2)).unwrap();
        let before = ledger.clone();

        let err = ledger.execute(&sale("widget", 15.0, 3)).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_stock("widget", 2, 3));
        assert_eq!(ledger, before);
    }

    #[test]
    fn sale_of_entire_stock_is_accepted() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(20.0)).unwrap();
        ledger.execute(&purchase("widget", 10.0, 2)).unwrap();
        ledger.execute(&sale("widget", 9.0, 2)).unwrap();
        assert_eq!(ledger.record("widget").unwrap().quantity, 0);
    }

    #[test]
    fn history_entries_match_original_texts() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(50.0)).unwrap();
        ledger.execute(&purchase("widget", 10.0, 5)).unwrap();
        ledger.execute(&sale("widget", 15.0, 3)).unwrap();

        assert_eq!(
            ledger.operations(),
            [
                "Balance changed by 50, new balance: 50",
                "Purchased 5 of widget at 10 each. Total: 50",
                "Sold 3 of widget at 15 each. Total: 45",
            ]
        );
    }

    #[test]
    fn review_returns_full_history_in_append_order() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(1.0)).unwrap();
        ledger.execute(&adjust(2.0)).unwrap();
        ledger.execute(&adjust(3.0)).unwrap();

        let all = ledger.review(0, 3).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all, ledger.operations());

        let middle = ledger.review(1, 2).unwrap();
        assert_eq!(middle, &ledger.operations()[1..2]);
    }

    #[test]
    fn review_rejects_bad_ranges() {
        let mut ledger = Ledger::empty();
        ledger.execute(&adjust(1.0)).unwrap();

        assert!(matches!(
            ledger.review(-1, 1),
            Err(LedgerError::InvalidRange { .. })
        ));
        assert!(matches!(
            ledger.review(0, 2),
            Err(LedgerError::InvalidRange { .. })
        ));
        assert!(matches!(
            ledger.review(1, 0),
            Err(LedgerError::InvalidRange { .. })
        ));
        assert_eq!(ledger.review(1, 1).unwrap(), &[] as &[String]);
    }

    fn command_strategy() -> impl Strategy<Value = LedgerCommand> {
        let product = prop_oneof![Just("widget"), Just("gadget"), Just("gizmo")];
        prop_oneof![
            (-500.0f64..500.0).prop_map(|amount| adjust(amount)),
            (product.clone(), 0.1f64..50.0, 0u64..10)
                .prop_map(|(p, price, qty)| purchase(p, price, qty)),
            (product, 0.1f64..50.0, 0u64..10).prop_map(|(p, price, qty)| sale(p, price, qty)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: rejected commands never mutate, accepted sales never
        /// oversell, and no stored quantity can end up negative.
        #[test]
        fn rejections_never_mutate_and_stock_never_oversold(
            commands in prop::collection::vec(command_strategy(), 1..40)
        ) {
            let mut ledger = Ledger::empty();

            for command in &commands {
                let before = ledger.clone();
                match ledger.execute(command) {
                    Ok(_) => {
                        if let LedgerCommand::RecordSale(cmd) = command {
                            let available = before
                                .record(&cmd.product)
                                .map_or(0, |r| r.quantity);
                            prop_assert!(cmd.quantity <= available);
                        }
                        prop_assert_eq!(
                            ledger.history_len(),
                            before.history_len() + 1
                        );
                    }
                    Err(_) => prop_assert_eq!(&ledger, &before),
                }
            }
        }

        /// Property: history only grows, and earlier entries are never edited.
        #[test]
        fn history_is_append_only(
            commands in prop::collection::vec(command_strategy(), 1..40)
        ) {
            let mut ledger = Ledger::empty();

            for command in &commands {
                let before = ledger.operations().to_vec();
                let _ = ledger.execute(command);
                prop_assert!(ledger.operations().starts_with(&before));
            }
        }
    }
}
