//! Append-only vote ledger for VoteChain.
//!
//! This crate is the heart of VoteChain. It provides:
//! - [`Record`], an immutable unit of chained data whose digest commits to its predecessor
//! - [`Ledger`], the single-writer in-memory chain with genesis creation, append, and verification
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - Full-chain auditing that reports every violation, not just the first
//! - A save/load seam ([`LedgerStore`]) with a JSON file implementation

pub mod clock;
pub mod error;
pub mod memory;
pub mod payload;
pub mod record;
pub mod store;
pub mod traits;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{IntegrityError, LedgerError, StoreError};
pub use memory::Ledger;
pub use payload::{Payload, VoteEntry};
pub use record::Record;
pub use store::{JsonFileStore, LedgerStore};
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{AuditReport, LedgerAuditor, Violation};
