//! The circuit-evaluation seam.

use crate::artifact::CompiledCircuit;
use crate::proximity::ProximityEngine;
use zkfence_common::{CircuitInputs, Error, Result, WitnessOutcome};

/// Black-box capability of an external circuit-evaluation backend: propagate
/// all signal values for the given inputs and check every constraint,
/// yielding either a full witness or the unsatisfied constraint.
///
/// Implementations must be deterministic: for a fixed artifact and input map
/// the outcome is always the same.
pub trait CircuitEngine: Send + Sync + std::fmt::Debug {
    /// The engine tag this backend answers to in artifact headers.
    fn tag(&self) -> &'static str;

    fn evaluate(&self, circuit: &CompiledCircuit, inputs: &CircuitInputs)
        -> Result<WitnessOutcome>;
}

/// Resolve the evaluation backend for an artifact by its engine tag.
pub fn engine_for(circuit: &CompiledCircuit) -> Result<Box<dyn CircuitEngine>> {
    match circuit.engine_tag() {
        crate::proximity::ENGINE_TAG => Ok(Box::new(ProximityEngine)),
        tag => Err(Error::BadArtifact(format!(
            "no circuit engine registered for tag '{tag}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::SignalBinding;

    #[test]
    fn test_unknown_engine_tag_rejected() {
        let bytes = CompiledCircuit::encode(
            "mystery",
            "mystery-engine",
            2,
            1,
            &[SignalBinding { name: "a".into(), wire: 1 }],
            b"",
        );
        let circuit = CompiledCircuit::decode(&bytes).unwrap();
        assert!(matches!(
            engine_for(&circuit).unwrap_err(),
            Error::BadArtifact(_)
        ));
    }

    #[test]
    fn test_proximity_tag_resolves() {
        let circuit = CompiledCircuit::decode(&crate::proximity::artifact_bytes()).unwrap();
        let engine = engine_for(&circuit).unwrap();
        assert_eq!(engine.tag(), crate::proximity::ENGINE_TAG);
    }
}
