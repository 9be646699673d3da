//! Cryptographic primitives for VoteChain.
//!
//! Provides domain-separated BLAKE3 hashing of record fields and generic
//! hash chain verification. All crypto operations wrap established
//! libraries; there is no custom cryptography here.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainLink, ChainVerifier};
pub use hasher::RecordHasher;
