//! Proof, public-signal and key data contracts.
//!
//! The proving scheme behind these types is a designated-verifier keyed
//! binding: proving and verification keys derived from one setup share a
//! 32-byte binding key bound to a single circuit id, the proof carries a
//! keyed commitment to the witness plus a fresh blinding nonce, and the
//! binding digest ties circuit id, blinding, commitment and public signals
//! together. Verification recomputes the binding and compares. The scheme is
//! opaque to the rest of the pipeline, which only relies on the contracts:
//! proofs are randomized, verification is a pure deterministic boolean, and
//! tampering with any component makes it return false.

use crate::digest::CircuitId;
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::witness::Witness;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed tag identifying the proving scheme a proof or key belongs to.
pub const SCHEME_TAG: &str = "zkfence-binding-v1";

/// Domain separator for binding digests.
const BINDING_DOMAIN: &[u8] = b"zkfence/binding/v1";

mod hex32 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &[u8; 32],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let raw = hex::decode(&s).map_err(|e| D::Error::custom(format!("invalid hex: {e}")))?;
        raw.try_into()
            .map_err(|_| D::Error::custom("expected 32 bytes of hex"))
    }
}

/// The ordered public signals a proof commits to, as extracted from the
/// witness's public wires in the circuit's declared order. The JSON form is
/// an array of decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicSignals(Vec<FieldElement>);

impl PublicSignals {
    pub fn new(values: Vec<FieldElement>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[FieldElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_slice(&std::fs::read(path)?)
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        Ok(std::fs::write(path, self.to_json_vec()?)?)
    }
}

/// A zero-knowledge proof under the binding scheme. Immutable once produced;
/// repeated proving runs over the same witness yield different blindings but
/// all verify against the same public signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub scheme: String,
    pub circuit_id: CircuitId,
    #[serde(with = "hex32")]
    pub blinding: [u8; 32],
    #[serde(with = "hex32")]
    pub commitment: [u8; 32],
    #[serde(with = "hex32")]
    pub binding: [u8; 32],
}

impl Proof {
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode a proof file. Structural problems (wrong shape, bad hex, wrong
    /// digest width) are the one condition reported as `MalformedProof`
    /// instead of a verification result.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedProof(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_slice(&std::fs::read(path)?)
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        Ok(std::fs::write(path, self.to_json_vec()?)?)
    }
}

/// Proving half of a setup: consumed only by the proof generator. Persisted
/// as an opaque binary artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvingKey {
    pub scheme: String,
    pub circuit_id: CircuitId,
    pub n_public: u32,
    pub binding_key: [u8; 32],
}

impl ProvingKey {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (key, _): (Self, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(key)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        Ok(std::fs::write(path, self.to_bytes()?)?)
    }
}

/// Verification half of a setup: consumed only by the verifier. Persisted as
/// a JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationKey {
    pub scheme: String,
    pub circuit_id: CircuitId,
    pub n_public: u32,
    #[serde(with = "hex32")]
    pub binding_key: [u8; 32],
}

impl VerificationKey {
    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::BadArtifact(format!("verification key: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_slice(&std::fs::read(path)?)
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        Ok(std::fs::write(path, self.to_json_vec()?)?)
    }
}

/// Keyed commitment over the full wire assignment.
pub fn witness_commitment(binding_key: &[u8; 32], witness: &Witness) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_keyed(binding_key);
    for value in witness.values() {
        hasher.update(&value.to_le_bytes());
    }
    *hasher.finalize().as_bytes()
}

/// Keyed digest tying every public component of a proof together. Both the
/// prover and the verifier compute exactly this.
pub fn binding_digest(
    binding_key: &[u8; 32],
    circuit_id: &CircuitId,
    blinding: &[u8; 32],
    commitment: &[u8; 32],
    signals: &PublicSignals,
) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_keyed(binding_key);
    hasher.update(BINDING_DOMAIN);
    hasher.update(circuit_id.as_bytes());
    hasher.update(blinding);
    hasher.update(commitment);
    hasher.update(&(signals.len() as u32).to_le_bytes());
    for signal in signals.values() {
        hasher.update(&signal.to_le_bytes());
    }
    *hasher.finalize().as_bytes()
}

/// Constant-time digest comparison.
pub fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    blake3::Hash::from(*a) == blake3::Hash::from(*b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof() -> Proof {
        Proof {
            scheme: SCHEME_TAG.to_string(),
            circuit_id: CircuitId::of_artifact(b"circuit"),
            blinding: [1u8; 32],
            commitment: [2u8; 32],
            binding: [3u8; 32],
        }
    }

    #[test]
    fn test_proof_json_roundtrip() {
        let proof = sample_proof();
        let decoded = Proof::from_json_slice(&proof.to_json_vec().unwrap()).unwrap();
        assert_eq!(proof, decoded);
    }

    #[test]
    fn test_proof_bad_hex_is_malformed() {
        let mut json: serde_json::Value =
            serde_json::from_slice(&sample_proof().to_json_vec().unwrap()).unwrap();
        json["binding"] = serde_json::Value::String("zz".into());
        let err = Proof::from_json_slice(&serde_json::to_vec(&json).unwrap()).unwrap_err();
        assert!(matches!(err, Error::MalformedProof(_)));
    }

    #[test]
    fn test_proving_key_binary_roundtrip() {
        let key = ProvingKey {
            scheme: SCHEME_TAG.to_string(),
            circuit_id: CircuitId::of_artifact(b"circuit"),
            n_public: 3,
            binding_key: [9u8; 32],
        };
        let decoded = ProvingKey::from_bytes(&key.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.n_public, 3);
        assert_eq!(decoded.binding_key, key.binding_key);
        assert_eq!(decoded.circuit_id, key.circuit_id);
    }

    #[test]
    fn test_binding_digest_sensitivity() {
        let key = [7u8; 32];
        let id = CircuitId::of_artifact(b"circuit");
        let signals = PublicSignals::new(vec![FieldElement::from_u64(100)]);
        let base = binding_digest(&key, &id, &[1u8; 32], &[2u8; 32], &signals);

        let other_blinding = binding_digest(&key, &id, &[0u8; 32], &[2u8; 32], &signals);
        assert_ne!(base, other_blinding);

        let other_signals = PublicSignals::new(vec![FieldElement::from_u64(101)]);
        let swapped = binding_digest(&key, &id, &[1u8; 32], &[2u8; 32], &other_signals);
        assert_ne!(base, swapped);

        let other_key = binding_digest(&[8u8; 32], &id, &[1u8; 32], &[2u8; 32], &signals);
        assert_ne!(base, other_key);
    }
}
