use serde::Serialize;
use tracing::error;
use votechain_ledger::payload::keys;
use votechain_ledger::LedgerReader;

use crate::candidates::CandidateTable;
use crate::error::TallyError;

/// Votes received by one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateCount {
    pub name: String,
    pub votes: u64,
}

/// Per-candidate counts, in candidate table order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoteCounts(Vec<CandidateCount>);

impl VoteCounts {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.iter().find(|c| c.name == name).map(|c| c.votes)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|c| c.votes).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateCount> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for VoteCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, votes)| CandidateCount {
                    name: name.into(),
                    votes,
                })
                .collect(),
        )
    }
}

/// The result of an election. Ties are reported as ties; no secondary
/// ordering ever picks a winner among them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Winner { candidate: String, votes: u64 },
    Tie { candidates: Vec<String>, votes: u64 },
}

/// Derives counts and the outcome by scanning ledger payloads.
pub struct Tally<'a, R: ?Sized> {
    ledger: &'a R,
    candidates: &'a CandidateTable,
}

impl<'a, R: LedgerReader + ?Sized> Tally<'a, R> {
    pub fn new(ledger: &'a R, candidates: &'a CandidateTable) -> Self {
        Self { ledger, candidates }
    }

    /// Count the votes in every non-genesis record.
    pub fn compute_results(&self) -> Result<VoteCounts, TallyError> {
        let mut counts: VoteCounts = self.candidates.iter().map(|c| (c.name.as_str(), 0)).collect();

        for record in self.ledger.records().iter().filter(|r| !r.is_genesis()) {
            let corrupt = |detail: String| {
                error!(index = record.index(), %detail, "corrupt vote payload");
                TallyError::CorruptPayload {
                    index: record.index(),
                    detail,
                }
            };

            let name = record
                .payload()
                .get(keys::CANDIDATE)
                .ok_or_else(|| corrupt("missing candidate".into()))?;
            let slot = counts
                .0
                .iter_mut()
                .find(|c| c.name == name)
                .ok_or_else(|| corrupt(format!("unknown candidate {name:?}")))?;
            slot.votes += 1;
        }

        Ok(counts)
    }

    /// Find the highest count; a single holder wins, several holders tie.
    pub fn determine_outcome(counts: &VoteCounts) -> Outcome {
        let top = counts.iter().map(|c| c.votes).max().unwrap_or(0);
        let mut leaders: Vec<String> = counts
            .iter()
            .filter(|c| c.votes == top)
            .map(|c| c.name.clone())
            .collect();

        if leaders.len() == 1 {
            Outcome::Winner {
                candidate: leaders.remove(0),
                votes: top,
            }
        } else {
            Outcome::Tie {
                candidates: leaders,
                votes: top,
            }
        }
    }

    /// Counts and outcome in one pass.
    pub fn outcome(&self) -> Result<(VoteCounts, Outcome), TallyError> {
        let counts = self.compute_results()?;
        let outcome = Self::determine_outcome(&counts);
        Ok((counts, outcome))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use votechain_ledger::{Ledger, LedgerWriter, ManualClock, Payload};
    use votechain_types::VoterIdFormat;

    use super::*;
    use crate::candidates::Candidate;
    use crate::registry::Registry;

    type T<'a> = Tally<'a, Ledger>;

    fn table() -> CandidateTable {
        CandidateTable::new(
            vec![
                Candidate::new("@", "Dinesh"),
                Candidate::new("#", "Seetha"),
                Candidate::new("$", "Rahul"),
            ],
            ".",
        )
        .unwrap()
    }

    fn registry() -> Registry {
        let ledger = Arc::new(Ledger::with_clock(Arc::new(ManualClock::new(0))));
        Registry::new(ledger, table(), VoterIdFormat::default())
    }

    #[test]
    fn fresh_ledger_counts_zero() {
        let reg = registry();
        let counts = Tally::new(&**reg.ledger(), reg.candidates())
            .compute_results()
            .unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.get("Dinesh"), Some(0));
    }

    #[test]
    fn counts_follow_cast_votes() {
        let reg = registry();
        reg.cast_vote("V001", "a", "@").unwrap();
        reg.cast_vote("V002", "b", "@").unwrap();
        reg.cast_vote("V003", "c", "$").unwrap();
        reg.cast_vote("V003", "c", "#").unwrap_err();

        let tally = Tally::new(&**reg.ledger(), reg.candidates());
        let (counts, outcome) = tally.outcome().unwrap();
        let order: Vec<_> = counts.iter().map(|c| (c.name.as_str(), c.votes)).collect();
        assert_eq!(order, vec![("Dinesh", 2), ("Seetha", 0), ("Rahul", 1)]);
        assert_eq!(
            outcome,
            Outcome::Winner {
                candidate: "Dinesh".into(),
                votes: 2
            }
        );
    }

    #[test]
    fn genesis_is_never_counted() {
        let table = CandidateTable::new(vec![Candidate::new("g", "first record")], ".").unwrap();
        let ledger = Ledger::new();
        let counts = Tally::new(&ledger, &table).compute_results().unwrap();
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn tie_between_two_leaders() {
        let counts: VoteCounts = [("A", 2), ("B", 2), ("C", 0)].into_iter().collect();
        assert_eq!(
            T::determine_outcome(&counts),
            Outcome::Tie {
                candidates: vec!["A".into(), "B".into()],
                votes: 2
            }
        );
    }

    #[test]
    fn clear_winner() {
        let counts: VoteCounts = [("A", 3), ("B", 1), ("C", 0)].into_iter().collect();
        assert_eq!(
            T::determine_outcome(&counts),
            Outcome::Winner {
                candidate: "A".into(),
                votes: 3
            }
        );
    }

    #[test]
    fn no_votes_is_a_tie_of_everyone() {
        let counts: VoteCounts = [("A", 0), ("B", 0), ("C", 0)].into_iter().collect();
        assert_eq!(
            T::determine_outcome(&counts),
            Outcome::Tie {
                candidates: vec!["A".into(), "B".into(), "C".into()],
                votes: 0
            }
        );
    }

    #[test]
    fn unknown_candidate_is_corrupt() {
        let ledger = Ledger::new();
        ledger.append(Payload::new().with("candidate", "Dinesh"));
        ledger.append(Payload::new().with("candidate", "Mallory"));
        let err = Tally::new(&ledger, &table()).compute_results().unwrap_err();
        assert_eq!(
            err,
            TallyError::CorruptPayload {
                index: 2,
                detail: "unknown candidate \"Mallory\"".into()
            }
        );
    }

    #[test]
    fn missing_candidate_is_corrupt() {
        let ledger = Ledger::new();
        ledger.append(Payload::new().with("voter_id", "V001"));
        let err = Tally::new(&ledger, &table()).compute_results().unwrap_err();
        assert!(matches!(err, TallyError::CorruptPayload { index: 1, .. }));
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_value(Outcome::Winner {
            candidate: "A".into(),
            votes: 3,
        })
        .unwrap();
        assert_eq!(json["outcome"], "winner");
        assert_eq!(json["candidate"], "A");
    }
}
