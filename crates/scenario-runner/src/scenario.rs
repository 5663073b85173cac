//! Scenario definitions and per-scenario results.

use serde::Serialize;
use std::fmt;
use zkfence_common::inputs::signal_map;
use zkfence_common::{CircuitInputs, FieldElement, Result, SignalMap};

/// Expected or actual outcome of one pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("PASS"),
            Outcome::Fail => f.write_str("FAIL"),
        }
    }
}

/// Pipeline stage a scenario reached. Witness failure short-circuits the
/// proving and verification stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Pending,
    InputAssembled,
    WitnessAttempted,
    WitnessFailed,
    Proved,
    Verified,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "PENDING",
            Stage::InputAssembled => "INPUT_ASSEMBLED",
            Stage::WitnessAttempted => "WITNESS_ATTEMPTED",
            Stage::WitnessFailed => "WITNESS_FAILED",
            Stage::Proved => "PROVED",
            Stage::Verified => "VERIFIED",
        };
        f.write_str(name)
    }
}

/// One named test case: a claimed point, a public zone, and the outcome the
/// pipeline is expected to produce for it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub user_x: u64,
    pub user_y: u64,
    pub center_x: u64,
    pub center_y: u64,
    pub max_distance_squared: u64,
    pub expected: Outcome,
}

impl Scenario {
    pub fn private_signals(&self) -> SignalMap {
        signal_map([
            ("userX", FieldElement::from_u64(self.user_x)),
            ("userY", FieldElement::from_u64(self.user_y)),
        ])
    }

    pub fn public_signals(&self) -> SignalMap {
        signal_map([
            ("centerX", FieldElement::from_u64(self.center_x)),
            ("centerY", FieldElement::from_u64(self.center_y)),
            ("maxDistanceSquared", FieldElement::from_u64(self.max_distance_squared)),
        ])
    }

    pub fn assemble(&self) -> Result<CircuitInputs> {
        CircuitInputs::assemble(self.private_signals(), self.public_signals())
    }

    /// Squared Euclidean distance between the claimed point and the center,
    /// recomputed outside the circuit. Diagnostic only: it never gates the
    /// pipeline outcome.
    pub fn distance_squared(&self) -> u128 {
        let dx = (self.user_x as i128) - (self.center_x as i128);
        let dy = (self.user_y as i128) - (self.center_y as i128);
        (dx * dx + dy * dy) as u128
    }
}

/// Report entry for one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub inputs: CircuitInputs,
    pub expected: Outcome,
    pub actual: Outcome,
    /// Diagnostic squared distance, recomputed independently of the circuit.
    pub distance_squared: u128,
    /// Furthest pipeline stage the scenario reached.
    pub stage: Stage,
    /// Fatal error isolated to this scenario, if any. Unsatisfiable
    /// constraints are a normal FAIL outcome, not an error.
    pub error: Option<String>,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        Scenario {
            name: "within-zone".into(),
            user_x: 120,
            user_y: 80,
            center_x: 100,
            center_y: 100,
            max_distance_squared: 2500,
            expected: Outcome::Pass,
        }
    }

    #[test]
    fn test_distance_squared_handles_negative_diffs() {
        assert_eq!(scenario().distance_squared(), 800);
    }

    #[test]
    fn test_assemble_produces_full_signal_map() {
        let inputs = scenario().assemble().unwrap();
        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs.get("userY"), Some(&FieldElement::from_u64(80)));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Pass.to_string(), "PASS");
        assert_eq!(Outcome::Fail.to_string(), "FAIL");
    }
}
