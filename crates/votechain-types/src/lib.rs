//! Foundation types for VoteChain.
//!
//! This crate provides the value types shared by every other VoteChain crate.
//!
//! # Key Types
//!
//! - [`Digest`]: 32-byte record digest; the zero digest is the genesis link sentinel
//! - [`Timestamp`]: wall-clock milliseconds since the UNIX epoch
//! - [`VoterIdFormat`]: the accepted shape of a voter identifier (letter prefix + fixed-width digits)
//! - [`VoterId`]: an identifier that has passed format validation

pub mod digest;
pub mod error;
pub mod temporal;
pub mod voter;

pub use digest::Digest;
pub use error::TypeError;
pub use temporal::Timestamp;
pub use voter::{VoterId, VoterIdFormat};
