use serde::{Deserialize, Serialize};

use crate::error::CandidateTableError;

/// One entry of the ballot: the symbol a voter types and the candidate it selects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub name: String,
}

impl Candidate {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Immutable symbol-to-candidate lookup table, validated at construction.
///
/// Candidates keep their declaration order, which is also the order results
/// are reported in. The exit symbol is reserved and never selects a candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateTable {
    candidates: Vec<Candidate>,
    exit_symbol: String,
}

impl CandidateTable {
    pub fn new(
        candidates: Vec<Candidate>,
        exit_symbol: impl Into<String>,
    ) -> Result<Self, CandidateTableError> {
        let exit_symbol = exit_symbol.into();
        if exit_symbol.trim().is_empty() {
            return Err(CandidateTableError::BlankExitSymbol);
        }
        if candidates.is_empty() {
            return Err(CandidateTableError::Empty);
        }

        for (i, c) in candidates.iter().enumerate() {
            if c.symbol.trim().is_empty() {
                return Err(CandidateTableError::BlankSymbol {
                    name: c.name.clone(),
                });
            }
            if c.name.trim().is_empty() {
                return Err(CandidateTableError::BlankName {
                    symbol: c.symbol.clone(),
                });
            }
            if c.symbol.eq_ignore_ascii_case(&exit_symbol) {
                return Err(CandidateTableError::SymbolIsExit(c.symbol.clone()));
            }
            let earlier = &candidates[..i];
            if earlier.iter().any(|e| e.symbol == c.symbol) {
                return Err(CandidateTableError::DuplicateSymbol(c.symbol.clone()));
            }
            if earlier.iter().any(|e| e.name == c.name) {
                return Err(CandidateTableError::DuplicateName(c.name.clone()));
            }
        }

        Ok(Self {
            candidates,
            exit_symbol,
        })
    }

    /// Candidate name selected by `symbol`, if any.
    pub fn name_for(&self, symbol: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| c.symbol == symbol)
            .map(|c| c.name.as_str())
    }

    pub fn symbol_for(&self, name: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.symbol.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.symbol_for(name).is_some()
    }

    pub fn exit_symbol(&self) -> &str {
        &self.exit_symbol
    }

    /// Whether `input` is the exit symbol, ignoring ASCII case.
    pub fn is_exit(&self, input: &str) -> bool {
        input.eq_ignore_ascii_case(&self.exit_symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.symbol.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateTable {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
