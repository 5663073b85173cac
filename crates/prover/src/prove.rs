//! Proof generation.

use crate::witness::WitnessGenerator;
use rand::RngCore;
use tracing::info;
use zkfence_circuit::CompiledCircuit;
use zkfence_common::proof::{binding_digest, witness_commitment};
use zkfence_common::{
    CircuitInputs, Error, Proof, ProvingKey, PublicSignals, Result, Witness, SCHEME_TAG,
};

/// Produce a proof and the public signals it commits to.
///
/// The public signals are read off the witness's public wires (1..=nPublic)
/// in the circuit's declared order. The blinding nonce is drawn fresh per
/// call, so repeated proving runs are not byte-identical, but every proof
/// from the same witness verifies against the same signals.
pub fn prove(witness: &Witness, key: &ProvingKey) -> Result<(Proof, PublicSignals)> {
    prove_with_rng(witness, key, &mut rand::thread_rng())
}

pub fn prove_with_rng<R: RngCore>(
    witness: &Witness,
    key: &ProvingKey,
    rng: &mut R,
) -> Result<(Proof, PublicSignals)> {
    if key.scheme != SCHEME_TAG {
        return Err(Error::BadArtifact(format!(
            "proving key uses unsupported scheme '{}'",
            key.scheme
        )));
    }
    if key.circuit_id != witness.circuit_id() {
        return Err(Error::ProvingKeyMismatch {
            expected: key.circuit_id,
            actual: witness.circuit_id(),
        });
    }
    let n_public = key.n_public as usize;
    if witness.len() <= n_public {
        return Err(Error::BadArtifact(format!(
            "witness has {} wires but the key declares {} public signals",
            witness.len(),
            n_public
        )));
    }

    let signals = PublicSignals::new(witness.values()[1..=n_public].to_vec());
    let commitment = witness_commitment(&key.binding_key, witness);
    let mut blinding = [0u8; 32];
    rng.fill_bytes(&mut blinding);
    let binding = binding_digest(
        &key.binding_key,
        &key.circuit_id,
        &blinding,
        &commitment,
        &signals,
    );

    info!(circuit_id = %key.circuit_id, public_signals = signals.len(), "proof generated");

    let proof = Proof {
        scheme: SCHEME_TAG.to_string(),
        circuit_id: key.circuit_id,
        blinding,
        commitment,
        binding,
    };
    Ok((proof, signals))
}

/// Combined flow: compute the witness for an input map and prove it in one
/// call. Unsatisfiable inputs surface as `UnsatisfiableConstraint`; no proof
/// is ever produced for them.
pub fn full_prove(
    inputs: &CircuitInputs,
    circuit: &CompiledCircuit,
    key: &ProvingKey,
) -> Result<(Proof, PublicSignals)> {
    let generator = WitnessGenerator::new(circuit)?;
    let witness = generator.compute(inputs)?.into_result()?;
    prove(&witness, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::setup;
    use zkfence_circuit::proximity;
    use zkfence_common::inputs::signal_map;
    use zkfence_common::FieldElement;

    fn fixture() -> (CompiledCircuit, ProvingKey, Witness) {
        let circuit = CompiledCircuit::decode(&proximity::artifact_bytes()).unwrap();
        let (pk, _) = setup(&circuit, &mut rand::thread_rng());
        let generator = WitnessGenerator::new(&circuit).unwrap();
        let witness = generator
            .compute(&inputs(100, 100, 0, 0, 50_000))
            .unwrap()
            .into_result()
            .unwrap();
        (circuit, pk, witness)
    }

    fn inputs(x: u64, y: u64, cx: u64, cy: u64, bound: u64) -> CircuitInputs {
        CircuitInputs::assemble(
            signal_map([
                ("userX", FieldElement::from_u64(x)),
                ("userY", FieldElement::from_u64(y)),
            ]),
            signal_map([
                ("centerX", FieldElement::from_u64(cx)),
                ("centerY", FieldElement::from_u64(cy)),
                ("maxDistanceSquared", FieldElement::from_u64(bound)),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_public_signals_follow_declared_order() {
        let (_, pk, witness) = fixture();
        let (_, signals) = prove(&witness, &pk).unwrap();
        assert_eq!(
            signals.values(),
            &[
                FieldElement::from_u64(0),      // centerX
                FieldElement::from_u64(0),      // centerY
                FieldElement::from_u64(50_000), // maxDistanceSquared
            ]
        );
    }

    #[test]
    fn test_repeated_proofs_differ_in_blinding_only() {
        let (_, pk, witness) = fixture();
        let (a, signals_a) = prove(&witness, &pk).unwrap();
        let (b, signals_b) = prove(&witness, &pk).unwrap();
        assert_ne!(a.blinding, b.blinding);
        assert_ne!(a.binding, b.binding);
        assert_eq!(a.commitment, b.commitment);
        assert_eq!(signals_a, signals_b);
    }

    #[test]
    fn test_mismatched_proving_key_rejected() {
        let (_, _, witness) = fixture();
        let other_bytes =
            zkfence_circuit::CompiledCircuit::encode("other", proximity::ENGINE_TAG, 76, 3, &[], b"");
        let other = CompiledCircuit::decode(&other_bytes).unwrap();
        let (other_pk, _) = setup(&other, &mut rand::thread_rng());
        let err = prove(&witness, &other_pk).unwrap_err();
        assert!(matches!(err, Error::ProvingKeyMismatch { .. }));
    }

    #[test]
    fn test_full_prove_rejects_out_of_zone() {
        let (circuit, pk, _) = fixture();
        let err = full_prove(&inputs(300, 300, 0, 0, 50_000), &circuit, &pk).unwrap_err();
        assert!(matches!(err, Error::UnsatisfiableConstraint(_)));
    }
}
