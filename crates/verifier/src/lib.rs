//! Proof verification.
//!
//! Verification is a pure function of the verification key, the ordered
//! public signals emitted alongside the proof, and the proof itself. Nothing
//! is mutated and no recomputed values may stand in for the emitted signals.
//! Any cryptographically invalid combination yields `false`; only a
//! structurally malformed proof or a signal-arity mismatch is reported as an
//! error instead of a verdict.

use tracing::{debug, warn};
use zkfence_common::proof::{binding_digest, digests_match};
use zkfence_common::{Error, Proof, PublicSignals, Result, VerificationKey, SCHEME_TAG};

pub fn verify(key: &VerificationKey, signals: &PublicSignals, proof: &Proof) -> Result<bool> {
    if key.scheme != SCHEME_TAG {
        return Err(Error::BadArtifact(format!(
            "verification key uses unsupported scheme '{}'",
            key.scheme
        )));
    }
    if proof.scheme != SCHEME_TAG {
        return Err(Error::MalformedProof(format!(
            "unknown proving scheme '{}'",
            proof.scheme
        )));
    }
    if signals.len() != key.n_public as usize {
        return Err(Error::SignalArity {
            expected: key.n_public as usize,
            actual: signals.len(),
        });
    }

    if proof.circuit_id != key.circuit_id {
        warn!(
            proof_circuit = %proof.circuit_id,
            key_circuit = %key.circuit_id,
            "proof is for a different circuit"
        );
        return Ok(false);
    }

    let expected = binding_digest(
        &key.binding_key,
        &key.circuit_id,
        &proof.blinding,
        &proof.commitment,
        signals,
    );
    let valid = digests_match(&expected, &proof.binding);
    debug!(circuit_id = %key.circuit_id, valid, "proof checked");
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkfence_circuit::{proximity, CompiledCircuit};
    use zkfence_common::inputs::signal_map;
    use zkfence_common::{CircuitInputs, FieldElement};
    use zkfence_prover::{prove, setup, WitnessGenerator};

    fn fixture() -> (VerificationKey, PublicSignals, Proof) {
        let circuit = CompiledCircuit::decode(&proximity::artifact_bytes()).unwrap();
        let (pk, vk) = setup(&circuit, &mut rand::thread_rng());
        let inputs = CircuitInputs::assemble(
            signal_map([
                ("userX", FieldElement::from_u64(100)),
                ("userY", FieldElement::from_u64(100)),
            ]),
            signal_map([
                ("centerX", FieldElement::from_u64(0)),
                ("centerY", FieldElement::from_u64(0)),
                ("maxDistanceSquared", FieldElement::from_u64(50_000)),
            ]),
        )
        .unwrap();
        let witness = WitnessGenerator::new(&circuit)
            .unwrap()
            .compute(&inputs)
            .unwrap()
            .into_result()
            .unwrap();
        let (proof, signals) = prove(&witness, &pk).unwrap();
        (vk, signals, proof)
    }

    #[test]
    fn test_valid_proof_verifies() {
        let (vk, signals, proof) = fixture();
        assert!(verify(&vk, &signals, &proof).unwrap());
    }

    #[test]
    fn test_verification_is_deterministic() {
        let (vk, signals, proof) = fixture();
        assert_eq!(
            verify(&vk, &signals, &proof).unwrap(),
            verify(&vk, &signals, &proof).unwrap()
        );
    }

    #[test]
    fn test_tampered_proof_fails() {
        let (vk, signals, proof) = fixture();
        for tamper in 0..3 {
            let mut bad = proof.clone();
            match tamper {
                0 => bad.blinding[0] ^= 1,
                1 => bad.commitment[0] ^= 1,
                _ => bad.binding[0] ^= 1,
            }
            assert!(!verify(&vk, &signals, &bad).unwrap());
        }
    }

    #[test]
    fn test_substituted_signals_fail() {
        let (vk, _, proof) = fixture();
        let forged = PublicSignals::new(vec![
            FieldElement::from_u64(0),
            FieldElement::from_u64(0),
            FieldElement::from_u64(999_999),
        ]);
        assert!(!verify(&vk, &forged, &proof).unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let (_, signals, proof) = fixture();
        let circuit = CompiledCircuit::decode(&proximity::artifact_bytes()).unwrap();
        let (_, other_vk) = setup(&circuit, &mut rand::thread_rng());
        assert!(!verify(&other_vk, &signals, &proof).unwrap());
    }

    #[test]
    fn test_arity_mismatch_is_error() {
        let (vk, signals, proof) = fixture();
        let short = PublicSignals::new(signals.values()[..2].to_vec());
        let err = verify(&vk, &short, &proof).unwrap_err();
        assert!(matches!(
            err,
            Error::SignalArity { expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_unknown_scheme_is_malformed() {
        let (vk, signals, proof) = fixture();
        let mut bad = proof;
        bad.scheme = "groth16".into();
        assert!(matches!(
            verify(&vk, &signals, &bad).unwrap_err(),
            Error::MalformedProof(_)
        ));
    }
}
