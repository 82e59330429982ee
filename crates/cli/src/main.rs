//! Interactive inventory and cash-ledger tool.
//!
//! Loads the persisted state from the working directory, runs the command
//! loop over stdin/stdout, and persists on the `end` command.

use std::io;

use anyhow::Context;

use stockbook_store::{StateStore, StorePaths};

mod command;
mod repl;

use repl::Repl;

fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let dir = std::env::current_dir().context("failed to resolve working directory")?;
    let store = StateStore::new(StorePaths::in_dir(&dir));
    let ledger = store.load();
    tracing::info!(
        balance = ledger.balance(),
        products = ledger.warehouse().len(),
        entries = ledger.history_len(),
        "state loaded"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = Repl::new(stdin.lock(), stdout.lock(), ledger, store);
    repl.run().context("command loop failed")?;
    Ok(())
}
