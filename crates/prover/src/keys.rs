//! Key-pair setup for one compiled circuit.
//!
//! Stands in for the external setup ceremony: draws the 32-byte binding key
//! both halves of the scheme share and bakes the circuit id and public arity
//! into each. Keys are bound to exactly one artifact; re-running setup for
//! the same circuit yields an independent key pair.

use rand::RngCore;
use tracing::info;
use zkfence_circuit::CompiledCircuit;
use zkfence_common::{ProvingKey, VerificationKey, SCHEME_TAG};

pub fn setup<R: RngCore>(circuit: &CompiledCircuit, rng: &mut R) -> (ProvingKey, VerificationKey) {
    let mut binding_key = [0u8; 32];
    rng.fill_bytes(&mut binding_key);

    let circuit_id = circuit.circuit_id();
    info!(circuit = circuit.name(), %circuit_id, "setup complete");

    let proving_key = ProvingKey {
        scheme: SCHEME_TAG.to_string(),
        circuit_id,
        n_public: circuit.n_public(),
        binding_key,
    };
    let verification_key = VerificationKey {
        scheme: SCHEME_TAG.to_string(),
        circuit_id,
        n_public: circuit.n_public(),
        binding_key,
    };
    (proving_key, verification_key)
}
