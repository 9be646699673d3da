use std::collections::BTreeSet;
use std::fmt;

use votechain_crypto::{ChainError, ChainVerifier};

use crate::record::Record;

/// Result of a full-chain audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditReport {
    pub record_count: usize,
    pub hash_chain_valid: bool,
    pub sequence_contiguous: bool,
    pub timestamps_monotonic: bool,
    pub genesis_intact: bool,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The lowest index with any violation.
    pub fn first_tampered(&self) -> Option<usize> {
        self.violations.iter().map(Violation::index).min()
    }

    pub fn tampered_indices(&self) -> BTreeSet<usize> {
        self.violations.iter().map(Violation::index).collect()
    }
}

/// A specific problem found during an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    Chain(ChainError),
    TimestampRegression { index: usize },
    GenesisPayload,
}

impl Violation {
    pub fn index(&self) -> usize {
        match self {
            Self::Chain(err) => err.index(),
            Self::TimestampRegression { index } => *index,
            Self::GenesisPayload => 0,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(err) => write!(f, "{err}"),
            Self::TimestampRegression { index } => {
                write!(f, "timestamp at index {index} is earlier than its predecessor")
            }
            Self::GenesisPayload => f.write_str("genesis record does not carry the sentinel payload"),
        }
    }
}

/// Whole-chain auditor.
///
/// Unlike verification, which stops at the first failing index, an audit
/// walks every record and collects everything it finds.
pub struct LedgerAuditor;

impl LedgerAuditor {
    pub fn audit(records: &[Record]) -> AuditReport {
        let mut violations: Vec<Violation> = ChainVerifier::violations(records)
            .into_iter()
            .map(Violation::Chain)
            .collect();

        let sequence_contiguous = !violations
            .iter()
            .any(|v| matches!(v, Violation::Chain(ChainError::IndexMismatch { .. })));
        let hash_chain_valid = violations
            .iter()
            .all(|v| matches!(v, Violation::Chain(ChainError::IndexMismatch { .. })));

        let genesis_intact = records.first().is_some_and(|g| g.payload().is_genesis());
        if !records.is_empty() && !genesis_intact {
            violations.push(Violation::GenesisPayload);
        }

        let mut timestamps_monotonic = true;
        for (index, pair) in records.windows(2).enumerate() {
            if pair[1].timestamp() < pair[0].timestamp() {
                timestamps_monotonic = false;
                violations.push(Violation::TimestampRegression { index: index + 1 });
            }
        }

        violations.sort_by_key(Violation::index);

        AuditReport {
            record_count: records.len(),
            hash_chain_valid,
            sequence_contiguous,
            timestamps_monotonic,
            genesis_intact,
            violations,
        }
    }
}
