use crate::digest::CircuitId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input signal '{0}' supplied as both private and public")]
    InputConflict(String),

    #[error("input schema mismatch: {0}")]
    InputSchema(String),

    #[error("unsatisfiable constraint: {0}")]
    UnsatisfiableConstraint(String),

    #[error("proving key is bound to circuit {expected}, witness came from circuit {actual}")]
    ProvingKeyMismatch {
        expected: CircuitId,
        actual: CircuitId,
    },

    #[error("public signal arity mismatch: verification key expects {expected}, got {actual}")]
    SignalArity { expected: usize, actual: usize },

    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("bad artifact: {0}")]
    BadArtifact(String),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(std::time::Duration),

    #[error("serialization error: {0}")]
    BincodeEncode(#[from] bincode::error::EncodeError),

    #[error("deserialization error: {0}")]
    BincodeDecode(#[from] bincode::error::DecodeError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether this error is a designed, expected failure mode (a rejected
    /// claim or a bad input map) rather than a system fault. Expected
    /// failures get a concise one-line summary at the CLI; everything else
    /// is reported with full diagnostic detail.
    pub fn is_expected_failure(&self) -> bool {
        matches!(
            self,
            Error::UnsatisfiableConstraint(_) | Error::InputConflict(_) | Error::InputSchema(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
