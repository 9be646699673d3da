use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel content of the genesis record.
pub const GENESIS_KEY: &str = "genesis";
pub const GENESIS_VALUE: &str = "first record";

/// Payload keys of a vote record.
pub mod keys {
    pub const VOTER_ID: &str = "voter_id";
    pub const NAME: &str = "name";
    pub const CANDIDATE: &str = "candidate";
    pub const SYMBOL: &str = "symbol";
}

/// Domain data carried by a record: a string-to-string mapping kept in key
/// order, so the same logical content always encodes to the same bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, String>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed payload of the genesis record.
    pub fn genesis() -> Self {
        Self::new().with(GENESIS_KEY, GENESIS_VALUE)
    }

    pub fn vote(entry: &VoteEntry) -> Self {
        Self::new()
            .with(keys::VOTER_ID, entry.voter_id.as_str())
            .with(keys::NAME, entry.name.as_str())
            .with(keys::CANDIDATE, entry.candidate.as_str())
            .with(keys::SYMBOL, entry.symbol.as_str())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_genesis(&self) -> bool {
        self.0.len() == 1 && self.get(GENESIS_KEY) == Some(GENESIS_VALUE)
    }

    /// Interpret the payload as a vote, if it carries all vote keys.
    pub fn as_vote(&self) -> Option<VoteEntry> {
        Some(VoteEntry {
            voter_id: self.get(keys::VOTER_ID)?.to_string(),
            name: self.get(keys::NAME)?.to_string(),
            candidate: self.get(keys::CANDIDATE)?.to_string(),
            symbol: self.get(keys::SYMBOL)?.to_string(),
        })
    }

    /// Canonical byte encoding used for digests: entries in key order, each
    /// key and value prefixed with its length.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.0.len() as u64).to_le_bytes());
        for (key, value) in &self.0 {
            out.extend_from_slice(&(key.len() as u64).to_le_bytes());
            out.extend_from_slice(key.as_bytes());
            out.extend_from_slice(&(value.len() as u64).to_le_bytes());
            out.extend_from_slice(value.as_bytes());
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The details of one accepted vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub voter_id: String,
    pub name: String,
    pub candidate: String,
    pub symbol: String,
}
