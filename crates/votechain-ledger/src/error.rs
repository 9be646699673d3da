use std::path::PathBuf;

use votechain_crypto::ChainError;

/// Errors produced by ledger construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger has no genesis record")]
    MissingGenesis,
}

/// Integrity failure reported by [`crate::LedgerReader::verify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("ledger tampered at index {index}: {cause}")]
    TamperedAt { index: usize, cause: ChainError },

    #[error("ledger tampered at index 0: genesis payload was replaced")]
    GenesisPayload,
}

impl IntegrityError {
    /// The first index at which verification failed.
    pub fn index(&self) -> usize {
        match self {
            Self::TamperedAt { index, .. } => *index,
            Self::GenesisPayload => 0,
        }
    }
}

impl From<ChainError> for IntegrityError {
    fn from(cause: ChainError) -> Self {
        Self::TamperedAt {
            index: cause.index(),
            cause,
        }
    }
}

/// Errors from saving or loading a ledger.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed ledger file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("unsupported ledger file format {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
