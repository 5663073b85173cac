pub mod codec;
pub mod digest;
pub mod error;
pub mod field;
pub mod inputs;
pub mod proof;
pub mod witness;

pub use digest::CircuitId;
pub use error::{Error, Result};
pub use field::FieldElement;
pub use inputs::{CircuitInputs, SignalMap};
pub use proof::{Proof, ProvingKey, PublicSignals, VerificationKey, SCHEME_TAG};
pub use witness::{Witness, WitnessOutcome};
