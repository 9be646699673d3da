use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use votechain_types::VoterIdFormat;

use crate::candidates::{Candidate, CandidateTable};
use crate::error::ConfigError;

/// Election settings: the ballot, the reserved exit symbol, and the voter id shape.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// exit_symbol = "."
///
/// [voter_id]
/// prefix = "V"
/// digits = 3
///
/// [[candidates]]
/// symbol = "@"
/// name = "Dinesh"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionConfig {
    pub exit_symbol: String,
    pub voter_id: VoterIdFormat,
    pub candidates: Vec<Candidate>,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            exit_symbol: ".".into(),
            voter_id: VoterIdFormat::default(),
            candidates: vec![
                Candidate::new("@", "Dinesh"),
                Candidate::new("#", "Seetha"),
                Candidate::new("$", "Rahul"),
            ],
        }
    }
}

impl ElectionConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.voter_id.validate()?;
        self.candidate_table()?;
        Ok(())
    }

    /// Build the immutable candidate table described by this config.
    pub fn candidate_table(&self) -> Result<CandidateTable, ConfigError> {
        Ok(CandidateTable::new(
            self.candidates.clone(),
            self.exit_symbol.clone(),
        )?)
    }
}
