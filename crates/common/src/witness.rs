//! Witness representation and its durable binary form.
//!
//! A witness is the full ordered wire assignment satisfying the circuit's
//! constraints for one input map; wire 0 is the constant 1. It only exists
//! for satisfiable inputs, which [`WitnessOutcome`] makes explicit at the
//! type level: callers match on satisfied/unsatisfiable instead of probing a
//! proof that was never produced.
//!
//! The durable form is a `.wtns`-style binary file: a fixed header (magic
//! bytes, format version, element width, field modulus, element count)
//! followed by the wire values as fixed-width little-endian field elements.

use crate::codec::Reader;
use crate::digest::CircuitId;
use crate::error::{Error, Result};
use crate::field::{self, FieldElement, FIELD_ELEMENT_BYTES};

pub const WTNS_MAGIC: [u8; 4] = *b"wtns";
pub const WTNS_VERSION: u32 = 2;

/// A satisfying wire assignment, tagged with the circuit that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    circuit_id: CircuitId,
    values: Vec<FieldElement>,
}

impl Witness {
    pub fn new(circuit_id: CircuitId, values: Vec<FieldElement>) -> Self {
        Self { circuit_id, values }
    }

    pub fn circuit_id(&self) -> CircuitId {
        self.circuit_id
    }

    pub fn values(&self) -> &[FieldElement] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize to the binary witness format.
    pub fn to_wtns_bytes(&self) -> Vec<u8> {
        encode_wtns(&self.values)
    }

    /// Decode a binary witness produced for the given circuit.
    pub fn from_wtns_bytes(bytes: &[u8], circuit_id: CircuitId) -> Result<Self> {
        Ok(Self::new(circuit_id, decode_wtns(bytes)?))
    }
}

/// Result of a witness computation: either a full satisfying assignment or
/// the reason no assignment exists. Unsatisfiability is the designed
/// rejection path for out-of-zone claims, not a fault.
#[derive(Debug, Clone)]
pub enum WitnessOutcome {
    Satisfied(Witness),
    Unsatisfiable { constraint: String },
}

impl WitnessOutcome {
    /// Collapse into a plain result, turning unsatisfiability into the
    /// corresponding error. Used at surfaces (like the CLI) where the
    /// witness itself is required.
    pub fn into_result(self) -> Result<Witness> {
        match self {
            WitnessOutcome::Satisfied(witness) => Ok(witness),
            WitnessOutcome::Unsatisfiable { constraint } => {
                Err(Error::UnsatisfiableConstraint(constraint))
            }
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, WitnessOutcome::Satisfied(_))
    }
}

pub fn encode_wtns(values: &[FieldElement]) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        WTNS_MAGIC.len() + 12 + FIELD_ELEMENT_BYTES + values.len() * FIELD_ELEMENT_BYTES,
    );
    out.extend_from_slice(&WTNS_MAGIC);
    out.extend_from_slice(&WTNS_VERSION.to_le_bytes());
    out.extend_from_slice(&(FIELD_ELEMENT_BYTES as u32).to_le_bytes());
    let mut modulus = field::modulus().to_bytes_le();
    modulus.resize(FIELD_ELEMENT_BYTES, 0);
    out.extend_from_slice(&modulus);
    out.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

pub fn decode_wtns(bytes: &[u8]) -> Result<Vec<FieldElement>> {
    let mut reader = Reader::new(bytes);
    if reader.take(4)? != WTNS_MAGIC {
        return Err(Error::BadArtifact("witness file has wrong magic".into()));
    }
    let version = reader.u32()?;
    if version != WTNS_VERSION {
        return Err(Error::BadArtifact(format!(
            "unsupported witness format version {version}"
        )));
    }
    let width = reader.u32()? as usize;
    if width != FIELD_ELEMENT_BYTES {
        return Err(Error::BadArtifact(format!(
            "unsupported field element width {width}"
        )));
    }
    let mut modulus = field::modulus().to_bytes_le();
    modulus.resize(FIELD_ELEMENT_BYTES, 0);
    if reader.take(FIELD_ELEMENT_BYTES)? != modulus.as_slice() {
        return Err(Error::BadArtifact(
            "witness file modulus does not match the pipeline field".into(),
        ));
    }
    let count = reader.u32()? as usize;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let mut chunk = [0u8; FIELD_ELEMENT_BYTES];
        chunk.copy_from_slice(reader.take(FIELD_ELEMENT_BYTES)?);
        values.push(FieldElement::from_le_bytes(&chunk)?);
    }
    if !reader.is_empty() {
        return Err(Error::BadArtifact(
            "witness file has trailing bytes".into(),
        ));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_witness() -> Witness {
        Witness::new(
            CircuitId::of_artifact(b"circuit"),
            vec![
                FieldElement::one(),
                FieldElement::from_u64(100),
                FieldElement::from_u64(20000),
            ],
        )
    }

    #[test]
    fn test_wtns_header_layout() {
        let bytes = sample_witness().to_wtns_bytes();
        assert_eq!(&bytes[..4], b"wtns");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 32);
        // element count sits after the 32-byte modulus
        assert_eq!(u32::from_le_bytes(bytes[44..48].try_into().unwrap()), 3);
    }

    #[test]
    fn test_wtns_roundtrip() {
        let witness = sample_witness();
        let decoded =
            Witness::from_wtns_bytes(&witness.to_wtns_bytes(), witness.circuit_id()).unwrap();
        assert_eq!(witness, decoded);
    }

    #[test]
    fn test_truncated_wtns_rejected() {
        let bytes = sample_witness().to_wtns_bytes();
        let err = decode_wtns(&bytes[..bytes.len() - 5]).unwrap_err();
        assert!(matches!(err, Error::BadArtifact(_)));
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let mut bytes = sample_witness().to_wtns_bytes();
        bytes[0] = b'x';
        assert!(decode_wtns(&bytes).is_err());
    }

    #[test]
    fn test_outcome_into_result() {
        let ok = WitnessOutcome::Satisfied(sample_witness()).into_result();
        assert!(ok.is_ok());
        let err = WitnessOutcome::Unsatisfiable {
            constraint: "distance exceeds bound".into(),
        }
        .into_result()
        .unwrap_err();
        assert!(matches!(err, Error::UnsatisfiableConstraint(_)));
    }
}
