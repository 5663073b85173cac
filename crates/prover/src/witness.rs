//! Witness generation.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};
use zkfence_circuit::{engine_for, CircuitEngine, CompiledCircuit};
use zkfence_common::{CircuitInputs, Error, Result, Witness, WitnessOutcome};

/// Wraps a circuit-evaluation backend for one compiled circuit: checks the
/// input map against the artifact's declared schema, then asks the engine
/// for the full satisfying assignment. Deterministic for fixed inputs, so
/// recomputation is idempotent.
pub struct WitnessGenerator<'a> {
    circuit: &'a CompiledCircuit,
    engine: Box<dyn CircuitEngine>,
}

impl<'a> WitnessGenerator<'a> {
    /// Use the backend registered for the artifact's engine tag.
    pub fn new(circuit: &'a CompiledCircuit) -> Result<Self> {
        let engine = engine_for(circuit)?;
        Ok(Self { circuit, engine })
    }

    /// Use a caller-supplied backend, e.g. an alternate circuit engine.
    pub fn with_engine(circuit: &'a CompiledCircuit, engine: Box<dyn CircuitEngine>) -> Self {
        Self { circuit, engine }
    }

    /// Compute the witness, or report the unsatisfied constraint. Input maps
    /// that do not exactly match the circuit's declared signal names fail
    /// with `InputSchema` before the engine runs.
    pub fn compute(&self, inputs: &CircuitInputs) -> Result<WitnessOutcome> {
        self.check_schema(inputs)?;
        debug!(
            circuit = self.circuit.name(),
            engine = self.engine.tag(),
            "computing witness"
        );
        let outcome = self.engine.evaluate(self.circuit, inputs)?;
        match &outcome {
            WitnessOutcome::Satisfied(witness) => {
                info!(
                    circuit = self.circuit.name(),
                    wires = witness.len(),
                    "witness computed"
                );
            }
            WitnessOutcome::Unsatisfiable { constraint } => {
                warn!(circuit = self.circuit.name(), %constraint, "no satisfying witness");
            }
        }
        Ok(outcome)
    }

    fn check_schema(&self, inputs: &CircuitInputs) -> Result<()> {
        let expected: BTreeSet<&str> = self.circuit.signal_names().collect();
        let actual: BTreeSet<&str> = inputs.names().collect();
        let missing: Vec<&str> = expected.difference(&actual).copied().collect();
        let unknown: Vec<&str> = actual.difference(&expected).copied().collect();
        if missing.is_empty() && unknown.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(format!("missing signals [{}]", missing.join(", ")));
        }
        if !unknown.is_empty() {
            parts.push(format!("unknown signals [{}]", unknown.join(", ")));
        }
        Err(Error::InputSchema(format!(
            "circuit '{}' {}",
            self.circuit.name(),
            parts.join(", ")
        )))
    }
}

/// Persist a witness in the binary witness format.
pub fn write_witness_file(witness: &Witness, path: &Path) -> Result<()> {
    std::fs::write(path, witness.to_wtns_bytes())?;
    debug!(path = %path.display(), wires = witness.len(), "witness file written");
    Ok(())
}

/// Load a witness file produced for the given circuit, checking that the
/// wire count matches the artifact.
pub fn read_witness_file(path: &Path, circuit: &CompiledCircuit) -> Result<Witness> {
    let bytes = std::fs::read(path)?;
    let witness = Witness::from_wtns_bytes(&bytes, circuit.circuit_id())?;
    if witness.len() as u32 != circuit.wire_count() {
        return Err(Error::BadArtifact(format!(
            "witness file has {} wires, circuit '{}' declares {}",
            witness.len(),
            circuit.name(),
            circuit.wire_count()
        )));
    }
    Ok(witness)
}
