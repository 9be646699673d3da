use votechain_types::Digest;

/// An element of a hash chain.
pub trait ChainLink {
    /// The index the element claims for itself.
    fn position(&self) -> u64;
    /// The stored digest.
    fn digest(&self) -> Digest;
    /// The stored link to the predecessor ([`Digest::zero`] for genesis).
    fn previous(&self) -> Digest;
    /// The digest recomputed from the element's current fields.
    fn recompute_digest(&self) -> Digest;
}

/// Hash chain integrity verifier.
///
/// For every element, in order:
/// 1. the stored index equals its position,
/// 2. the recomputed digest equals the stored digest,
/// 3. the stored previous link equals the predecessor's stored digest
///    (or the zero sentinel for the first element).
pub struct ChainVerifier;

impl ChainVerifier {
    /// Verify a chain, stopping at the first failing position.
    pub fn verify_chain(links: &[impl ChainLink]) -> Result<(), ChainError> {
        for index in 0..links.len() {
            if let Some(err) = Self::check_at(links, index).into_iter().next() {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Collect every violation in the chain, in position order.
    pub fn violations(links: &[impl ChainLink]) -> Vec<ChainError> {
        (0..links.len())
            .flat_map(|index| Self::check_at(links, index))
            .collect()
    }

    fn check_at(links: &[impl ChainLink], index: usize) -> Vec<ChainError> {
        let link = &links[index];
        let mut found = Vec::new();

        if link.position() != index as u64 {
            found.push(ChainError::IndexMismatch {
                index,
                found: link.position(),
            });
        }

        if link.recompute_digest() != link.digest() {
            found.push(ChainError::HashMismatch { index });
        }

        let expected_prev = match index {
            0 => Digest::zero(),
            _ => links[index - 1].digest(),
        };
        if link.previous() != expected_prev {
            found.push(if index == 0 {
                ChainError::GenesisHasPrevious
            } else {
                ChainError::BrokenLink { index }
            });
        }

        found
    }
}

/// Errors from chain verification.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("genesis record links to a previous digest (should be the sentinel)")]
    GenesisHasPrevious,

    #[error("index mismatch at position {index}: record claims index {found}")]
    IndexMismatch { index: usize, found: u64 },

    #[error("broken link at index {index}: previous digest does not match")]
    BrokenLink { index: usize },

    #[error("hash mismatch at index {index}: computed digest differs from stored")]
    HashMismatch { index: usize },
}

impl ChainError {
    /// The chain position the error refers to.
    pub fn index(&self) -> usize {
        match self {
            Self::GenesisHasPrevious => 0,
            Self::IndexMismatch { index, .. }
            | Self::BrokenLink { index }
            | Self::HashMismatch { index } => *index,
        }
    }
}
