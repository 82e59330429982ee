//! The interactive command loop.
//!
//! Generic over its reader and writer so whole sessions can be driven from
//! tests. The loop owns the ledger and the store; `end` is the only command
//! that persists and the only one that terminates the loop normally.

use std::io::{self, BufRead, Write};

use stockbook_ledger::{
    AdjustBalance, Ledger, LedgerCommand, LedgerError, RecordPurchase, RecordSale, input,
};
use stockbook_store::StateStore;

use crate::command::Command;

/// Whether the loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Outcome of reading the product / price / quantity fields.
enum Fields {
    /// Input stream ended mid-command.
    Eof,
    /// A field failed validation; the rejection is already reported.
    Invalid,
    Valid {
        product: String,
        unit_price: f64,
        quantity: u64,
    },
}

pub struct Repl<R, W> {
    reader: R,
    writer: W,
    ledger: Ledger,
    store: StateStore,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(reader: R, writer: W, ledger: Ledger, store: StateStore) -> Self {
        Self {
            reader,
            writer,
            ledger,
            store,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run the loop until `end` or end-of-input.
    ///
    /// End-of-input is a forced exit: nothing is saved, changes since the last
    /// `end` are lost.
    pub fn run(&mut self) -> io::Result<()> {
        self.show_commands()?;
        loop {
            let Some(name) = self.prompt("\nEnter a command: ")? else {
                return Ok(());
            };
            let flow = match Command::parse(&name.to_lowercase()) {
                Some(Command::Balance) => self.cmd_balance()?,
                Some(Command::Sale) => self.cmd_sale()?,
                Some(Command::Purchase) => self.cmd_purchase()?,
                Some(Command::Account) => self.cmd_account()?,
                Some(Command::List) => self.cmd_list()?,
                Some(Command::Warehouse) => self.cmd_warehouse()?,
                Some(Command::Review) => self.cmd_review()?,
                Some(Command::End) => self.cmd_end()?,
                None => {
                    writeln!(self.writer, "Invalid command!")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(());
            }
            self.show_commands()?;
        }
    }

    fn show_commands(&mut self) -> io::Result<()> {
        writeln!(self.writer, "\nAvailable commands:")?;
        for name in Command::MENU {
            writeln!(self.writer, "{name}")?;
        }
        writeln!(self.writer)
    }

    /// Prompt and read one trimmed line; `None` means end-of-input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{text}")?;
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Map a domain rejection to its user-facing message.
    fn report(&mut self, err: &LedgerError) -> io::Result<()> {
        let message = match err {
            LedgerError::InvalidAmount(_) => "Invalid amount!",
            LedgerError::InvalidNumber(_) => "Invalid input!",
            LedgerError::InvalidIndex(_) => "Invalid index. Please enter valid integers.",
            LedgerError::InvalidRange { .. } => "Invalid index range.",
            LedgerError::InsufficientStock { .. } => "Not enough stock for this sale.",
            LedgerError::InsufficientFunds { .. } => "Insufficient funds for this purchase.",
        };
        writeln!(self.writer, "{message}")
    }

    fn execute(&mut self, command: LedgerCommand) -> io::Result<()> {
        match self.ledger.execute(&command) {
            Ok(event) => tracing::debug!(entry = %event, "command applied"),
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    fn cmd_balance(&mut self) -> io::Result<Flow> {
        let Some(raw) = self.prompt("Enter amount to add/subtract: ")? else {
            return Ok(Flow::Exit);
        };
        match input::parse_amount(&raw) {
            Ok(amount) => {
                self.execute(LedgerCommand::AdjustBalance(AdjustBalance { amount }))?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    /// Read the product / price / quantity triple shared by sale and purchase.
    ///
    /// Mirrors the original flow: a bad price aborts before the quantity is
    /// even asked for.
    fn prompt_product_fields(&mut self) -> io::Result<Fields> {
        let Some(product) = self.prompt("Enter product name: ")? else {
            return Ok(Fields::Eof);
        };
        let Some(raw_price) = self.prompt("Enter price per unit: ")? else {
            return Ok(Fields::Eof);
        };
        let unit_price = match input::parse_price(&raw_price) {
            Ok(price) => price,
            Err(err) => {
                self.report(&err)?;
                return Ok(Fields::Invalid);
            }
        };
        let Some(raw_quantity) = self.prompt("Enter quantity: ")? else {
            return Ok(Fields::Eof);
        };
        let quantity = match input::parse_quantity(&raw_quantity) {
            Ok(quantity) => quantity,
            Err(err) => {
                self.report(&err)?;
                return Ok(Fields::Invalid);
            }
        };
        Ok(Fields::Valid {
            product,
            unit_price,
            quantity,
        })
    }

    fn cmd_sale(&mut self) -> io::Result<Flow> {
        match self.prompt_product_fields()? {
            Fields::Eof => Ok(Flow::Exit),
            Fields::Invalid => Ok(Flow::Continue),
            Fields::Valid {
                product,
                unit_price,
                quantity,
            } => {
                self.execute(LedgerCommand::RecordSale(RecordSale {
                    product,
                    unit_price,
                    quantity,
                }))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn cmd_purchase(&mut self) -> io::Result<Flow> {
        match self.prompt_product_fields()? {
            Fields::Eof => Ok(Flow::Exit),
            Fields::Invalid => Ok(Flow::Continue),
            Fields::Valid {
                product,
                unit_price,
                quantity,
            } => {
                self.execute(LedgerCommand::RecordPurchase(RecordPurchase {
                    product,
                    unit_price,
                    quantity,
                }))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn cmd_account(&mut self) -> io::Result<Flow> {
        writeln!(
            self.writer,
            "Current account balance: {}",
            self.ledger.balance()
        )?;
        Ok(Flow::Continue)
    }

    fn cmd_list(&mut self) -> io::Result<Flow> {
        if self.ledger.warehouse().is_empty() {
            writeln!(self.writer, "Warehouse is empty.")?;
        } else {
            writeln!(self.writer, "Warehouse Inventory:")?;
            for (product, record) in self.ledger.warehouse() {
                writeln!(
                    self.writer,
                    "{product}: {} units, Price: {}",
                    record.quantity, record.price
                )?;
            }
        }
        Ok(Flow::Continue)
    }

    fn cmd_warehouse(&mut self) -> io::Result<Flow> {
        let Some(product) = self.prompt("Enter product name: ")? else {
            return Ok(Flow::Exit);
        };
        match self.ledger.record(&product) {
            Some(record) => writeln!(
                self.writer,
                "{product}: {} units, Price: {}",
                record.quantity, record.price
            )?,
            None => writeln!(self.writer, "{product} not found in warehouse.")?,
        }
        Ok(Flow::Continue)
    }

    fn cmd_review(&mut self) -> io::Result<Flow> {
        let Some(raw_start) = self.prompt("Enter start index: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(raw_end) = self.prompt("Enter end index: ")? else {
            return Ok(Flow::Exit);
        };

        // Blank fields default to the full history.
        let len = self.ledger.history_len() as i64;
        let range = input::parse_index(&raw_start, 0)
            .and_then(|start| input::parse_index(&raw_end, len).map(|end| (start, end)));
        match range {
            Ok((start, end)) => match self.ledger.review(start, end) {
                Ok(entries) => {
                    for entry in entries {
                        writeln!(self.writer, "{entry}")?;
                    }
                }
                Err(err) => self.report(&err)?,
            },
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn cmd_end(&mut self) -> io::Result<Flow> {
        // Per-entity failures are logged by the store; the session still ends.
        let _failures = self.store.save(&self.ledger);
        writeln!(self.writer, "All data saved.")?;
        Ok(Flow::Exit)
    }
}
