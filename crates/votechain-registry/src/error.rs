use std::path::PathBuf;

use votechain_types::TypeError;

/// Reasons a vote is refused. None of them change any state; the caller
/// may retry with corrected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    #[error("invalid voter id format: {0:?}")]
    InvalidIdentifierFormat(String),

    #[error("voter {0} has already voted")]
    DuplicateVote(String),

    #[error("unknown candidate symbol {0:?}")]
    UnknownCandidate(String),
}

/// Failure while counting votes. Only reachable if something other than the
/// registry wrote to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TallyError {
    #[error("corrupt payload at index {index}: {detail}")]
    CorruptPayload { index: u64, detail: String },
}

/// Problems with a candidate table definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateTableError {
    #[error("candidate table is empty")]
    Empty,

    #[error("exit symbol must not be blank")]
    BlankExitSymbol,

    #[error("candidate {name:?} has a blank symbol")]
    BlankSymbol { name: String },

    #[error("candidate with symbol {symbol:?} has a blank name")]
    BlankName { symbol: String },

    #[error("symbol {0:?} is assigned to more than one candidate")]
    DuplicateSymbol(String),

    #[error("candidate name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("symbol {0:?} collides with the exit symbol")]
    SymbolIsExit(String),
}

/// Errors loading an [`crate::ElectionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to encode config: {0}")]
    Encode(String),

    #[error(transparent)]
    VoterId(#[from] TypeError),

    #[error(transparent)]
    Candidates(#[from] CandidateTableError),
}
