//! File locations for the persisted entities.

use std::path::{Path, PathBuf};

pub const BALANCE_FILE: &str = "balance.json";
pub const WAREHOUSE_FILE: &str = "warehouse.json";
pub const OPERATIONS_FILE: &str = "operations.json";

/// Three independent file locations, one per persisted entity.
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub balance: PathBuf,
    pub warehouse: PathBuf,
    pub operations: PathBuf,
}

impl StorePaths {
    /// Standard file names under the given directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            balance: dir.join(BALANCE_FILE),
            warehouse: dir.join(WAREHOUSE_FILE),
            operations: dir.join(OPERATIONS_FILE),
        }
    }
}
