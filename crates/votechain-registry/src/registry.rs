use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};
use votechain_ledger::{Ledger, LedgerReader, LedgerWriter, Payload, VoteEntry};
use votechain_types::{VoterId, VoterIdFormat};

use crate::candidates::CandidateTable;
use crate::error::VoteError;

/// Enforces the election rules and turns accepted votes into ledger records.
///
/// Each voter id moves from unseen to cast exactly once per session; there is
/// no re-vote and no retraction. The voted set and the ledger append are
/// updated under one lock, so a refused vote never touches the ledger and two
/// concurrent casts for the same id cannot both succeed.
pub struct Registry<L = Ledger> {
    ledger: Arc<L>,
    candidates: CandidateTable,
    format: VoterIdFormat,
    voted: Mutex<HashSet<String>>,
}

impl<L: LedgerWriter + LedgerReader> Registry<L> {
    /// A registry for a ledger that holds no votes yet.
    pub fn new(ledger: Arc<L>, candidates: CandidateTable, format: VoterIdFormat) -> Self {
        Self {
            ledger,
            candidates,
            format,
            voted: Mutex::new(HashSet::new()),
        }
    }

    /// A registry for a ledger that may already hold votes, e.g. one restored
    /// from disk. Every voter id found in the ledger counts as already cast.
    pub fn resume(ledger: Arc<L>, candidates: CandidateTable, format: VoterIdFormat) -> Self {
        let voted: HashSet<String> = ledger
            .records()
            .iter()
            .filter(|r| !r.is_genesis())
            .filter_map(|r| r.payload().as_vote())
            .map(|v| v.voter_id)
            .collect();
        info!(voters = voted.len(), "resumed registry from ledger");
        Self {
            ledger,
            candidates,
            format,
            voted: Mutex::new(voted),
        }
    }

    /// Check `identifier` against the configured voter id format.
    pub fn validate_identifier(&self, identifier: &str) -> Result<VoterId, VoteError> {
        self.format
            .parse(identifier)
            .map_err(|_| VoteError::InvalidIdentifierFormat(identifier.to_string()))
    }

    /// Record a vote and return the chosen candidate's name.
    pub fn cast_vote(&self, identifier: &str, name: &str, symbol: &str) -> Result<String, VoteError> {
        let voter_id = self.validate_identifier(identifier).inspect_err(|err| {
            warn!(%err, "vote refused");
        })?;

        let mut voted = self.voted();
        if voted.contains(voter_id.as_str()) {
            let err = VoteError::DuplicateVote(voter_id.to_string());
            warn!(%err, "vote refused");
            return Err(err);
        }

        let Some(candidate) = self.candidates.name_for(symbol) else {
            let err = VoteError::UnknownCandidate(symbol.to_string());
            warn!(%err, "vote refused");
            return Err(err);
        };

        let entry = VoteEntry {
            voter_id: voter_id.to_string(),
            name: name.to_string(),
            candidate: candidate.to_string(),
            symbol: symbol.to_string(),
        };
        let record = self.ledger.append(Payload::vote(&entry));
        voted.insert(entry.voter_id);

        info!(
            voter = %voter_id,
            candidate,
            index = record.index(),
            "vote recorded"
        );
        Ok(candidate.to_string())
    }

    pub fn has_voted(&self, identifier: &str) -> bool {
        self.voted().contains(identifier)
    }

    pub fn voted_count(&self) -> usize {
        self.voted().len()
    }

    pub fn candidates(&self) -> &CandidateTable {
        &self.candidates
    }

    pub fn format(&self) -> &VoterIdFormat {
        &self.format
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    fn voted(&self) -> MutexGuard<'_, HashSet<String>> {
        self.voted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
