//! Proving side of the pipeline: witness generation over the circuit-engine
//! seam, the setup that produces a key pair for one compiled circuit, and
//! proof generation from a witness and proving key.

pub mod keys;
pub mod prove;
pub mod witness;

pub use keys::setup;
pub use prove::{full_prove, prove, prove_with_rng};
pub use witness::{read_witness_file, write_witness_file, WitnessGenerator};
