//! Election rules on top of the VoteChain ledger.
//!
//! - [`CandidateTable`]: the fixed, validated symbol-to-candidate mapping
//! - [`Registry`]: voter id validation, one vote per id, and appending accepted votes
//! - [`Tally`]: vote counts and winner/tie determination from ledger payloads
//! - [`ElectionConfig`]: TOML-loadable election settings

pub mod candidates;
pub mod config;
pub mod error;
pub mod registry;
pub mod tally;

pub use candidates::{Candidate, CandidateTable};
pub use config::ElectionConfig;
pub use error::{CandidateTableError, ConfigError, TallyError, VoteError};
pub use registry::Registry;
pub use tally::{CandidateCount, Outcome, Tally, VoteCounts};
