use crate::error::IntegrityError;
use crate::payload::Payload;
use crate::record::Record;

/// Write boundary for ledger append operations.
///
/// Implementations serialize all appends: each record depends on the digest
/// of the one before it.
pub trait LedgerWriter: Send + Sync {
    /// Link `payload` onto the end of the chain and return the new record.
    fn append(&self, payload: Payload) -> Record;
}

/// Read boundary for ledger queries and verification.
pub trait LedgerReader: Send + Sync {
    /// Number of records, genesis included.
    fn record_count(&self) -> usize;

    fn get(&self, index: usize) -> Option<Record>;

    /// The most recently appended record (genesis for a fresh ledger).
    fn head(&self) -> Record;

    /// Snapshot of every record in chain order.
    fn records(&self) -> Vec<Record>;

    /// Walk the chain and report the first index that fails either the
    /// digest recomputation or the previous-digest link check.
    fn verify(&self) -> Result<(), IntegrityError>;
}
