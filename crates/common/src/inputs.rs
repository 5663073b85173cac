//! Circuit input assembly.
//!
//! The assembler merges the prover's private values with the public zone
//! parameters into a single signal map. It is circuit-agnostic: whether the
//! merged set matches the circuit's declared schema is checked by the witness
//! generator, which knows the compiled artifact.

use crate::error::{Error, Result};
use crate::field::FieldElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named signal values, e.g. `{"userX": 120, "userY": 80}`.
pub type SignalMap = BTreeMap<String, FieldElement>;

/// The full input map for one witness computation: signal name to field
/// element, private and public signals merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitInputs {
    signals: SignalMap,
}

impl CircuitInputs {
    /// Merge private and public signal maps. The key sets must be disjoint;
    /// a signal supplied on both sides is a fatal input error.
    pub fn assemble(private: SignalMap, public: SignalMap) -> Result<Self> {
        let mut signals = private;
        for (name, value) in public {
            if signals.insert(name.clone(), value).is_some() {
                return Err(Error::InputConflict(name));
            }
        }
        Ok(Self { signals })
    }

    /// Parse an already-merged input file, as written by the circuit
    /// toolchain (`input.json` style).
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let signals: SignalMap = serde_json::from_slice(bytes)?;
        Ok(Self { signals })
    }

    pub fn get(&self, name: &str) -> Option<&FieldElement> {
        self.signals.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Convenience for building a [`SignalMap`] from name/value pairs.
pub fn signal_map<I, N>(pairs: I) -> SignalMap
where
    I: IntoIterator<Item = (N, FieldElement)>,
    N: Into<String>,
{
    pairs.into_iter().map(|(n, v)| (n.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> SignalMap {
        signal_map([
            ("centerX", FieldElement::from_u64(100)),
            ("centerY", FieldElement::from_u64(100)),
            ("maxDistanceSquared", FieldElement::from_u64(2500)),
        ])
    }

    #[test]
    fn test_assemble_merges_disjoint_maps() {
        let private = signal_map([
            ("userX", FieldElement::from_u64(120)),
            ("userY", FieldElement::from_u64(80)),
        ]);
        let inputs = CircuitInputs::assemble(private, zone()).unwrap();
        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs.get("userX"), Some(&FieldElement::from_u64(120)));
        assert_eq!(
            inputs.get("maxDistanceSquared"),
            Some(&FieldElement::from_u64(2500))
        );
    }

    #[test]
    fn test_assemble_rejects_overlap() {
        let private = signal_map([("centerX", FieldElement::from_u64(1))]);
        let err = CircuitInputs::assemble(private, zone()).unwrap_err();
        assert!(matches!(err, Error::InputConflict(name) if name == "centerX"));
    }

    #[test]
    fn test_from_json_accepts_mixed_value_forms() {
        let inputs =
            CircuitInputs::from_json_slice(br#"{"userX": 120, "userY": "80"}"#).unwrap();
        assert_eq!(inputs.get("userY"), Some(&FieldElement::from_u64(80)));
    }
}
