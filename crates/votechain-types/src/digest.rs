use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Text form of the zero digest, used as the genesis record's previous link.
pub const SENTINEL: &str = "0";

/// Number of hex characters shown by [`Digest::short_hex`].
const SHORT_HEX_LEN: usize = 20;

/// A 32-byte record digest.
///
/// The all-zero value never results from hashing in practice and is reserved
/// as the sentinel stored in the genesis record's `previous` field. It renders
/// as `"0"` and `"0"` parses back to it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Wrap a pre-computed hash.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The genesis sentinel (all zeros).
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full 64-character hex encoding. The sentinel is encoded as `"0"`.
    pub fn to_hex(&self) -> String {
        if self.is_zero() {
            return SENTINEL.to_string();
        }
        hex::encode(self.0)
    }

    /// Truncated hex for display.
    pub fn short_hex(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_HEX_LEN);
        hex
    }

    /// Parse from a 64-character hex string or the `"0"` sentinel.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s == SENTINEL {
            return Ok(Self::zero());
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Digest {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        Digest::from_hash(bytes)
    }

    #[test]
    fn zero_is_sentinel() {
        let zero = Digest::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.to_hex(), "0");
        assert_eq!(format!("{zero}"), "0");
    }

    #[test]
    fn sentinel_parses_to_zero() {
        assert_eq!(Digest::from_hex("0").unwrap(), Digest::zero());
    }

    #[test]
    fn hex_roundtrip() {
        let d = sample();
        let hex = d.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(Digest::from_hex(&hex).unwrap(), d);
    }

    #[test]
    fn short_hex_is_20_chars() {
        assert_eq!(sample().short_hex().len(), 20);
        assert_eq!(Digest::zero().short_hex(), "0");
    }

    #[test]
    fn wrong_length_rejected() {
        let err = Digest::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn bad_hex_rejected() {
        assert!(matches!(
            Digest::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Digest::zero()).unwrap();
        assert_eq!(json, "\"0\"");
        let d = sample();
        let parsed: Digest = serde_json::from_str(&serde_json::to_string(&d).unwrap()).unwrap();
        assert_eq!(parsed, d);
    }
}
