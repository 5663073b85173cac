use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identity of a compiled circuit: the BLAKE3 digest of its artifact bytes.
/// Every witness, proving key and verification key carries the id of the
/// circuit it belongs to, so cross-circuit mixups are caught before any
/// proving work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CircuitId(pub [u8; 32]);

impl CircuitId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Digest an artifact's raw bytes into its circuit id.
    pub fn of_artifact(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for CircuitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct CircuitIdVisitor;

impl<'de> Visitor<'de> for CircuitIdVisitor {
    type Value = CircuitId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 64-character hex string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CircuitId, E> {
        CircuitId::from_hex(v).map_err(|e| E::custom(format!("invalid circuit id: {e}")))
    }
}

impl<'de> Deserialize<'de> for CircuitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(CircuitIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_id_hex_roundtrip() {
        let id = CircuitId::new([7u8; 32]);
        let decoded = CircuitId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, decoded);
    }

    #[test]
    fn test_circuit_id_rejects_short_hex() {
        assert!(CircuitId::from_hex("abcd").is_err());
    }

    #[test]
    fn test_artifact_digest_is_stable() {
        let a = CircuitId::of_artifact(b"some artifact");
        let b = CircuitId::of_artifact(b"some artifact");
        let c = CircuitId::of_artifact(b"another artifact");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
