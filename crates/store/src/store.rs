use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use stockbook_ledger::{Ledger, Warehouse};

use crate::paths::StorePaths;

/// Persistence failure for a single entity file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// The file this failure concerns.
    pub fn path(&self) -> &Path {
        match self {
            StoreError::Io { path, .. }
            | StoreError::Decode { path, .. }
            | StoreError::Encode { path, .. } => path,
        }
    }
}

/// Loads and saves the ledger's three entities as independent JSON files.
///
/// There is no cross-entity atomicity: a crash between the three writes can
/// leave the files inconsistent. Accepted limitation for a single-user tool.
#[derive(Debug, Clone)]
pub struct StateStore {
    paths: StorePaths,
}

impl StateStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Load all three entities, substituting defaults where needed.
    ///
    /// A missing file is a normal first run; an unreadable or malformed file
    /// is logged and replaced by the default. Never fails.
    pub fn load(&self) -> Ledger {
        let balance = load_entity(&self.paths.balance, 0.0f64);
        let warehouse = load_entity(&self.paths.warehouse, Warehouse::new());
        let operations = load_entity(&self.paths.operations, Vec::new());
        Ledger::from_parts(balance, warehouse, operations)
    }

    /// Write all three entities, attempting each one regardless of earlier
    /// failures. Returns the failures; an empty vec means a full save.
    pub fn save(&self, ledger: &Ledger) -> Vec<StoreError> {
        let mut failures = Vec::new();

        let results = [
            write_entity(&self.paths.balance, &ledger.balance()),
            write_entity(&self.paths.warehouse, ledger.warehouse()),
            write_entity(&self.paths.operations, &ledger.operations()),
        ];
        for result in results {
            if let Err(err) = result {
                tracing::error!(path = %err.path().display(), error = %err, "failed to save entity");
                failures.push(err);
            }
        }
        failures
    }
}

fn load_entity<T: DeserializeOwned>(path: &Path, default: T) -> T {
    match read_entity(path) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "unreadable state file, substituting default"
            );
            default
        }
    }
}

fn read_entity<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let value = serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

fn write_entity<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, raw).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
