//! Compiled-circuit artifact format.
//!
//! A `zkfc` artifact carries everything the pipeline needs to drive an
//! external evaluation backend: the circuit name, the engine tag that selects
//! the backend, the field modulus, the wire count, the public arity (public
//! wires occupy indices 1..=nPublic, wire 0 being the constant 1), the named
//! input-signal bindings, and an opaque body only the backend reads. The
//! circuit id is the BLAKE3 digest of the artifact bytes and is what keys and
//! witnesses are bound to.

use std::path::Path;
use zkfence_common::codec::{put_string, Reader};
use zkfence_common::field::{self, FIELD_ELEMENT_BYTES};
use zkfence_common::{CircuitId, Error, Result};

pub const ARTIFACT_MAGIC: [u8; 4] = *b"zkfc";
pub const ARTIFACT_VERSION: u32 = 1;

/// Binding of a named input signal to its wire index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalBinding {
    pub name: String,
    pub wire: u32,
}

/// A loaded compiled circuit. Immutable for the pipeline's purposes.
#[derive(Debug, Clone)]
pub struct CompiledCircuit {
    name: String,
    engine: String,
    wire_count: u32,
    n_public: u32,
    inputs: Vec<SignalBinding>,
    body: Vec<u8>,
    circuit_id: CircuitId,
}

impl CompiledCircuit {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let circuit_id = CircuitId::of_artifact(bytes);
        let mut reader = Reader::new(bytes);
        if reader.take(4)? != ARTIFACT_MAGIC {
            return Err(Error::BadArtifact("circuit artifact has wrong magic".into()));
        }
        let version = reader.u32()?;
        if version != ARTIFACT_VERSION {
            return Err(Error::BadArtifact(format!(
                "unsupported circuit artifact version {version}"
            )));
        }
        let name = reader.string()?;
        let engine = reader.string()?;
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
                "circuit artifact modulus does not match the pipeline field".into(),
            ));
        }
        let wire_count = reader.u32()?;
        let n_public = reader.u32()?;
        if wire_count == 0 || n_public >= wire_count {
            return Err(Error::BadArtifact(
                "circuit artifact wire layout is inconsistent".into(),
            ));
        }
        let input_count = reader.u32()? as usize;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            let signal = SignalBinding {
                name: reader.string()?,
                wire: reader.u32()?,
            };
            if signal.wire == 0 || signal.wire >= wire_count {
                return Err(Error::BadArtifact(format!(
                    "input signal '{}' bound to invalid wire {}",
                    signal.name, signal.wire
                )));
            }
            if inputs.iter().any(|s: &SignalBinding| s.name == signal.name) {
                return Err(Error::BadArtifact(format!(
                    "duplicate input signal '{}'",
                    signal.name
                )));
            }
            inputs.push(signal);
        }
        let body_len = reader.u32()? as usize;
        let body = reader.take(body_len)?.to_vec();
        if !reader.is_empty() {
            return Err(Error::BadArtifact(
                "circuit artifact has trailing bytes".into(),
            ));
        }
        Ok(Self {
            name,
            engine,
            wire_count,
            n_public,
            inputs,
            body,
            circuit_id,
        })
    }

    /// Encode an artifact from its parts. Used by circuit tooling and tests;
    /// the pipeline itself only ever decodes.
    pub fn encode(
        name: &str,
        engine: &str,
        wire_count: u32,
        n_public: u32,
        inputs: &[SignalBinding],
        body: &[u8],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&ARTIFACT_MAGIC);
        out.extend_from_slice(&ARTIFACT_VERSION.to_le_bytes());
        put_string(&mut out, name);
        put_string(&mut out, engine);
        out.extend_from_slice(&(FIELD_ELEMENT_BYTES as u32).to_le_bytes());
        let mut modulus = field::modulus().to_bytes_le();
        modulus.resize(FIELD_ELEMENT_BYTES, 0);
        out.extend_from_slice(&modulus);
        out.extend_from_slice(&wire_count.to_le_bytes());
        out.extend_from_slice(&n_public.to_le_bytes());
        out.extend_from_slice(&(inputs.len() as u32).to_le_bytes());
        for signal in inputs {
            put_string(&mut out, &signal.name);
            out.extend_from_slice(&signal.wire.to_le_bytes());
        }
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        out
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine_tag(&self) -> &str {
        &self.engine
    }

    pub fn wire_count(&self) -> u32 {
        self.wire_count
    }

    /// Number of public signals; they occupy wires 1..=nPublic.
    pub fn n_public(&self) -> u32 {
        self.n_public
    }

    pub fn input_signals(&self) -> &[SignalBinding] {
        &self.inputs
    }

    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|s| s.name.as_str())
    }

    pub fn input_wire(&self, name: &str) -> Option<u32> {
        self.inputs.iter().find(|s| s.name == name).map(|s| s.wire)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn circuit_id(&self) -> CircuitId {
        self.circuit_id
    }
}
