use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The accepted shape of a voter identifier: a fixed ASCII-letter prefix
/// followed by exactly `digits` ASCII digits (`V` + 3 digits by default).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoterIdFormat {
    pub prefix: String,
    pub digits: usize,
}

impl Default for VoterIdFormat {
    fn default() -> Self {
        Self {
            prefix: "V".into(),
            digits: 3,
        }
    }
}

impl VoterIdFormat {
    pub fn new(prefix: impl Into<String>, digits: usize) -> Result<Self, TypeError> {
        let format = Self {
            prefix: prefix.into(),
            digits,
        };
        format.validate()?;
        Ok(format)
    }

    /// Check the format itself is usable.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.prefix.is_empty() || !self.prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TypeError::InvalidFormat(format!(
                "prefix {:?} must be one or more ASCII letters",
                self.prefix
            )));
        }
        if self.digits == 0 {
            return Err(TypeError::InvalidFormat(
                "numeric suffix must have at least one digit".into(),
            ));
        }
        Ok(())
    }

    pub fn matches(&self, raw: &str) -> bool {
        raw.strip_prefix(self.prefix.as_str()).is_some_and(|suffix| {
            suffix.len() == self.digits && suffix.bytes().all(|b| b.is_ascii_digit())
        })
    }

    /// Validate `raw` against this format.
    pub fn parse(&self, raw: &str) -> Result<VoterId, TypeError> {
        if self.matches(raw) {
            Ok(VoterId(raw.to_string()))
        } else {
            Err(TypeError::InvalidVoterId(raw.to_string()))
        }
    }

    /// Human-readable example, e.g. `V101`.
    pub fn example(&self) -> String {
        let suffix: String = "101".chars().cycle().take(self.digits).collect();
        format!("{}{}", self.prefix, suffix)
    }
}

/// A voter identifier that has passed [`VoterIdFormat`] validation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoterId({})", self.0)
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VoterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
