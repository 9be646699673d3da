use serde::{Deserialize, Serialize};
use votechain_crypto::{ChainLink, RecordHasher};
use votechain_types::{Digest, Timestamp};

use crate::payload::Payload;

/// An immutable, hash-linked unit of ledger data.
///
/// The digest covers `(index, timestamp, payload, previous_digest)` and is
/// computed exactly once, when the record is built. Nothing recomputes and
/// overwrites it afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    index: u64,
    timestamp: Timestamp,
    payload: Payload,
    previous_digest: Digest,
    digest: Digest,
}

impl Record {
    /// Build a record and compute its digest.
    pub fn new(index: u64, timestamp: Timestamp, payload: Payload, previous_digest: Digest) -> Self {
        let digest = Self::compute_digest(index, timestamp, &payload, previous_digest);
        Self {
            index,
            timestamp,
            payload,
            previous_digest,
            digest,
        }
    }

    /// Reassemble a record with a digest that was stored earlier.
    ///
    /// The digest is taken as given; use [`crate::LedgerReader::verify`] to
    /// check it against the other fields.
    pub fn from_parts(
        index: u64,
        timestamp: Timestamp,
        payload: Payload,
        previous_digest: Digest,
        digest: Digest,
    ) -> Self {
        Self {
            index,
            timestamp,
            payload,
            previous_digest,
            digest,
        }
    }

    pub fn compute_digest(
        index: u64,
        timestamp: Timestamp,
        payload: &Payload,
        previous_digest: Digest,
    ) -> Digest {
        RecordHasher::RECORD.hash_fields(&[
            &index.to_le_bytes(),
            &timestamp.as_millis().to_le_bytes(),
            &payload.canonical_bytes(),
            previous_digest.as_bytes(),
        ])
    }

    /// The digest recomputed from the current field values.
    pub fn recompute_digest(&self) -> Digest {
        Self::compute_digest(self.index, self.timestamp, &self.payload, self.previous_digest)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn previous_digest(&self) -> Digest {
        self.previous_digest
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

impl ChainLink for Record {
    fn position(&self) -> u64 {
        self.index
    }

    fn digest(&self) -> Digest {
        self.digest
    }

    fn previous(&self) -> Digest {
        self.previous_digest
    }

    fn recompute_digest(&self) -> Digest {
        Record::recompute_digest(self)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn payload() -> Payload {
        [("voter_id", "V101"), ("candidate", "Dinesh")]
            .into_iter()
            .collect()
    }

    fn base() -> Record {
        Record::new(3, Timestamp::from_millis(1_000), payload(), Digest::from_hash([7; 32]))
    }

    #[test]
    fn identical_inputs_identical_digest() {
        assert_eq!(base().digest(), base().digest());
        assert_eq!(base().digest(), base().recompute_digest());
    }

    #[test]
    fn each_field_changes_the_digest() {
        let d = base().digest();
        let p = payload();
        let prev = Digest::from_hash([7; 32]);
        let ts = Timestamp::from_millis(1_000);

        assert_ne!(Record::new(4, ts, p.clone(), prev).digest(), d);
        assert_ne!(Record::new(3, Timestamp::from_millis(1_001), p.clone(), prev).digest(), d);
        assert_ne!(Record::new(3, ts, p.clone().with("name", "x"), prev).digest(), d);
        assert_ne!(Record::new(3, ts, p, Digest::from_hash([8; 32])).digest(), d);
    }

    #[test]
    fn from_parts_keeps_stored_digest() {
        let r = base();
        let stored = Digest::from_hash([1; 32]);
        let restored = Record::from_parts(
            r.index(),
            r.timestamp(),
            r.payload().clone(),
            r.previous_digest(),
            stored,
        );
        assert_eq!(restored.digest(), stored);
        assert_ne!(restored.recompute_digest(), stored);
    }

    #[test]
    fn serde_field_names() {
        let json = serde_json::to_value(base()).unwrap();
        for key in ["index", "timestamp", "payload", "previous_digest", "digest"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, base());
    }

    proptest! {
        #[test]
        fn digest_is_deterministic(
            index in any::<u64>(),
            millis in any::<u64>(),
            entries in prop::collection::btree_map("[a-z_]{1,8}", ".{0,16}", 0..6),
            prev in any::<[u8; 32]>(),
        ) {
            let payload: Payload = entries.into_iter().collect();
            let a = Record::new(index, Timestamp::from_millis(millis), payload.clone(), Digest::from_hash(prev));
            let b = Record::new(index, Timestamp::from_millis(millis), payload, Digest::from_hash(prev));
            prop_assert_eq!(a.digest(), b.digest());
        }
    }
}
