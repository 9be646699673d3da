use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};
use votechain_crypto::ChainVerifier;
use votechain_types::{Digest, Timestamp};

use crate::clock::{Clock, SystemClock};
use crate::error::{IntegrityError, LedgerError};
use crate::payload::Payload;
use crate::record::Record;
use crate::traits::{LedgerReader, LedgerWriter};
use crate::validation::{AuditReport, LedgerAuditor};

/// In-memory hash-chained ledger.
///
/// The sole holder of write authority over its records. Appends are
/// serialized under a write lock; reads take a read lock and return
/// snapshots, so verification and tallies never observe a half-built append.
pub struct Ledger {
    clock: Arc<dyn Clock>,
    inner: RwLock<Vec<Record>>,
}

impl Ledger {
    /// A fresh ledger holding only its genesis record, stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let genesis = Self::create_genesis(clock.now());
        debug!(digest = %genesis.digest().short_hex(), "created genesis record");
        Self {
            clock,
            inner: RwLock::new(vec![genesis]),
        }
    }

    /// Rebuild a ledger from previously exported records.
    ///
    /// Digests are kept exactly as stored and nothing is recomputed, so a
    /// later [`LedgerReader::verify`] still sees any tampering that happened
    /// while the records were out of process.
    pub fn from_records(records: Vec<Record>, clock: Arc<dyn Clock>) -> Result<Self, LedgerError> {
        if records.is_empty() {
            return Err(LedgerError::MissingGenesis);
        }
        debug!(records = records.len(), "restored ledger");
        Ok(Self {
            clock,
            inner: RwLock::new(records),
        })
    }

    fn create_genesis(timestamp: Timestamp) -> Record {
        Record::new(0, timestamp, Payload::genesis(), Digest::zero())
    }

    /// Ordered copy of every record, for display or persistence.
    pub fn export(&self) -> Vec<Record> {
        self.records()
    }

    /// Check the whole chain and report every violation found.
    pub fn audit(&self) -> AuditReport {
        LedgerAuditor::audit(&self.read())
    }

    pub fn genesis(&self) -> Record {
        self.read()[0].clone()
    }

    // A poisoned lock only means another thread panicked mid-append; the
    // vector itself is only ever pushed to after the record is complete.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Record>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Record>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.read().len())
            .finish()
    }
}

impl LedgerWriter for Ledger {
    fn append(&self, payload: Payload) -> Record {
        let mut records = self.write();

        let (previous, floor) = records
            .last()
            .map(|last| (last.digest(), last.timestamp()))
            .unwrap_or((Digest::zero(), Timestamp::from_millis(0)));
        let timestamp = self.clock.now().max(floor);

        let record = Record::new(records.len() as u64, timestamp, payload, previous);
        debug!(
            index = record.index(),
            digest = %record.digest().short_hex(),
            "appended record"
        );
        records.push(record.clone());
        record
    }
}

impl LedgerReader for Ledger {
    fn record_count(&self) -> usize {
        self.read().len()
    }

    fn get(&self, index: usize) -> Option<Record> {
        self.read().get(index).cloned()
    }

    fn head(&self) -> Record {
        let records = self.read();
        records[records.len() - 1].clone()
    }

    fn records(&self) -> Vec<Record> {
        self.read().clone()
    }

    fn verify(&self) -> Result<(), IntegrityError> {
        let records = self.read();
        if records.first().is_some_and(|g| !g.payload().is_genesis()) {
            warn!(index = 0, "genesis payload replaced");
            return Err(IntegrityError::GenesisPayload);
        }
        match ChainVerifier::verify_chain(&records) {
            Ok(()) => {
                debug!(records = records.len(), "ledger verified");
                Ok(())
            }
            Err(cause) => {
                warn!(index = cause.index(), %cause, "ledger integrity check failed");
                Err(cause.into())
            }
        }
    }
}
