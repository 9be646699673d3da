use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::memory::Ledger;
use crate::record::Record;

/// Version tag written into every ledger file.
pub const FILE_FORMAT: u32 = 1;

/// Save/load boundary for externalizing a ledger.
///
/// Implementations must hand back records with their original digests; they
/// never recompute them.
pub trait LedgerStore {
    fn save(&self, records: &[Record]) -> Result<(), StoreError>;

    /// Load stored records, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<Record>>, StoreError>;
}

#[derive(Serialize, Deserialize)]
struct LedgerFile {
    format: u32,
    records: Vec<Record>,
}

/// Stores a ledger as a pretty-printed JSON document.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-save leaves the previous file intact.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn malformed(&self, reason: impl ToString) -> StoreError {
        StoreError::Malformed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl LedgerStore for JsonFileStore {
    fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let file = LedgerFile {
            format: FILE_FORMAT,
            records: records.to_vec(),
        };
        let encoded = serde_json::to_vec_pretty(&file).map_err(|e| self.malformed(e))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, encoded).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;

        info!(path = %self.path.display(), records = records.len(), "saved ledger");
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<Record>>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };

        let file: LedgerFile = serde_json::from_slice(&bytes).map_err(|e| self.malformed(e))?;
        if file.format != FILE_FORMAT {
            return Err(StoreError::UnsupportedFormat {
                found: file.format,
                expected: FILE_FORMAT,
            });
        }

        info!(path = %self.path.display(), records = file.records.len(), "loaded ledger");
        Ok(Some(file.records))
    }
}

impl Ledger {
    /// Write every record to `store`.
    pub fn persist(&self, store: &impl LedgerStore) -> Result<(), StoreError> {
        store.save(&self.export())
    }

    /// Rebuild a ledger from `store`, or `None` if the store is empty.
    pub fn restore(
        store: &impl LedgerStore,
        clock: Arc<dyn Clock>,
    ) -> Result<Option<Self>, StoreError> {
        match store.load()? {
            Some(records) => Ok(Some(Ledger::from_records(records, clock)?)),
            None => Ok(None),
        }
    }
}
