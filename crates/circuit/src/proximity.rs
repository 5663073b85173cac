//! Evaluation backend for the location-proximity circuit.
//!
//! The circuit proves that a private point (userX, userY) lies inside the
//! disc around a public center with a public inclusive squared-radius bound:
//!
//! ```text
//! (userX - centerX)^2 + (userY - centerY)^2 <= maxDistanceSquared
//! ```
//!
//! The comparison is expressed the way the constraint system does it: the
//! slack `bound - distance^2` is decomposed into a fixed-width bit vector,
//! which only has a valid assignment when the slack is non-negative, and the
//! in-zone output wire is constrained to 1. Out-of-zone inputs therefore have
//! no witness at all rather than a witness with a zero flag.
//!
//! Boundary inclusivity (`<=` rather than `<`) is an assumption carried over
//! from the reference test vectors pending confirmation from the circuit
//! source.

use crate::artifact::{CompiledCircuit, SignalBinding};
use crate::engine::CircuitEngine;
use num_bigint::BigUint;
use num_traits::One;
use tracing::debug;
use zkfence_common::codec::Reader;
use zkfence_common::{CircuitInputs, Error, FieldElement, Result, Witness, WitnessOutcome};

pub const ENGINE_TAG: &str = "proximity-v1";
pub const CIRCUIT_NAME: &str = "proximity";

/// Coordinates must fit this many bits so squared distances fit the slack
/// decomposition.
pub const COORD_BITS: u64 = 31;

/// Width of the slack bit decomposition carried in the artifact body.
pub const SLACK_BITS: u32 = 64;

// Wire layout: constant 1, public inputs, private inputs, then the
// intermediate signals in propagation order.
const WIRE_ONE: usize = 0;
const WIRE_CENTER_X: usize = 1;
const WIRE_CENTER_Y: usize = 2;
const WIRE_MAX_DIST: usize = 3;
const WIRE_USER_X: usize = 4;
const WIRE_USER_Y: usize = 5;
const FIXED_WIRES: usize = 11; // wires 0..=10: the above plus dx, dy, dx², dy², dist²

const N_PUBLIC: u32 = 3;

fn signal_bindings() -> Vec<SignalBinding> {
    [
        ("centerX", WIRE_CENTER_X),
        ("centerY", WIRE_CENTER_Y),
        ("maxDistanceSquared", WIRE_MAX_DIST),
        ("userX", WIRE_USER_X),
        ("userY", WIRE_USER_Y),
    ]
    .into_iter()
    .map(|(name, wire)| SignalBinding {
        name: name.into(),
        wire: wire as u32,
    })
    .collect()
}

/// Total wire count for a given slack width: the fixed wires, one wire per
/// slack bit, and the in-zone flag.
fn wire_count_for(slack_bits: u32) -> u32 {
    FIXED_WIRES as u32 + slack_bits + 1
}

/// The compiled proximity artifact bundled with this backend, standing in
/// for the output of the external circuit toolchain.
pub fn artifact_bytes() -> Vec<u8> {
    CompiledCircuit::encode(
        CIRCUIT_NAME,
        ENGINE_TAG,
        wire_count_for(SLACK_BITS),
        N_PUBLIC,
        &signal_bindings(),
        &SLACK_BITS.to_le_bytes(),
    )
}

#[derive(Debug)]
pub struct ProximityEngine;

impl ProximityEngine {
    /// Read and validate the slack width from the artifact body, and check
    /// the artifact's wire layout agrees with this backend.
    fn layout(&self, circuit: &CompiledCircuit) -> Result<u32> {
        let mut reader = Reader::new(circuit.body());
        let slack_bits = reader.u32().map_err(|_| {
            Error::BadArtifact("proximity artifact body is missing the slack width".into())
        })?;
        if !reader.is_empty() || slack_bits == 0 || slack_bits > 64 {
            return Err(Error::BadArtifact(format!(
                "proximity artifact has invalid slack width {slack_bits}"
            )));
        }
        if circuit.wire_count() != wire_count_for(slack_bits) || circuit.n_public() != N_PUBLIC {
            return Err(Error::BadArtifact(
                "proximity artifact wire layout does not match the engine".into(),
            ));
        }
        for binding in signal_bindings() {
            if circuit.input_wire(&binding.name) != Some(binding.wire) {
                return Err(Error::BadArtifact(format!(
                    "proximity artifact binds signal '{}' to an unexpected wire",
                    binding.name
                )));
            }
        }
        Ok(slack_bits)
    }
}

fn require<'a>(inputs: &'a CircuitInputs, name: &str) -> Result<&'a FieldElement> {
    inputs
        .get(name)
        .ok_or_else(|| Error::InputSchema(format!("missing input signal '{name}'")))
}

/// Absolute difference of two coordinates as an integer.
fn abs_diff(a: &FieldElement, b: &FieldElement) -> BigUint {
    if a.as_biguint() >= b.as_biguint() {
        a.as_biguint() - b.as_biguint()
    } else {
        b.as_biguint() - a.as_biguint()
    }
}

impl CircuitEngine for ProximityEngine {
    fn tag(&self) -> &'static str {
        ENGINE_TAG
    }

    fn evaluate(
        &self,
        circuit: &CompiledCircuit,
        inputs: &CircuitInputs,
    ) -> Result<WitnessOutcome> {
        let slack_bits = self.layout(circuit)?;

        let center_x = require(inputs, "centerX")?;
        let center_y = require(inputs, "centerY")?;
        let bound = require(inputs, "maxDistanceSquared")?;
        let user_x = require(inputs, "userX")?;
        let user_y = require(inputs, "userY")?;

        // Range constraints: coordinates and bound must fit the comparator.
        let coord_limit = BigUint::one() << COORD_BITS;
        for (name, value) in [
            ("centerX", center_x),
            ("centerY", center_y),
            ("userX", user_x),
            ("userY", user_y),
        ] {
            if value.as_biguint() >= &coord_limit {
                return Ok(WitnessOutcome::Unsatisfiable {
                    constraint: format!("coordinate '{name}' does not fit {COORD_BITS} bits"),
                });
            }
        }
        if bound.as_biguint().bits() > u64::from(slack_bits) {
            return Ok(WitnessOutcome::Unsatisfiable {
                constraint: format!("maxDistanceSquared does not fit {slack_bits} bits"),
            });
        }

        // Signal propagation. The field wires carry the in-field values
        // (subtraction wraps the modulus); squaring recovers the integer
        // squares because the coordinates are range-constrained.
        let dx = user_x.sub(center_x);
        let dy = user_y.sub(center_y);
        let dx2 = dx.mul(&dx);
        let dy2 = dy.mul(&dy);
        let dist = dx2.add(&dy2);

        let dist_int = {
            let ax = abs_diff(user_x, center_x);
            let ay = abs_diff(user_y, center_y);
            &ax * &ax + &ay * &ay
        };
        debug!(
            distance_squared = %dist_int,
            bound = %bound,
            "proximity constraint evaluated"
        );

        // The comparison constraint: bound - dist² must decompose into
        // slack_bits bits, and the in-zone flag must be 1. No assignment
        // exists when the claimed point is outside the disc.
        if &dist_int > bound.as_biguint() {
            return Ok(WitnessOutcome::Unsatisfiable {
                constraint: format!(
                    "squared distance {dist_int} exceeds maxDistanceSquared {bound}"
                ),
            });
        }
        let slack = bound.as_biguint() - &dist_int;

        let mut values = Vec::with_capacity(wire_count_for(slack_bits) as usize);
        values.push(FieldElement::one()); // WIRE_ONE
        values.push(center_x.clone());
        values.push(center_y.clone());
        values.push(bound.clone());
        values.push(user_x.clone());
        values.push(user_y.clone());
        values.push(dx);
        values.push(dy);
        values.push(dx2);
        values.push(dy2);
        values.push(dist);
        for i in 0..u64::from(slack_bits) {
            values.push(if slack.bit(i) {
                FieldElement::one()
            } else {
                FieldElement::zero()
            });
        }
        values.push(FieldElement::one()); // in-zone flag

        debug_assert_eq!(values.len() as u32, circuit.wire_count());
        debug_assert_eq!(values[WIRE_ONE], FieldElement::one());

        Ok(WitnessOutcome::Satisfied(Witness::new(
            circuit.circuit_id(),
            values,
        )))
    }
}
