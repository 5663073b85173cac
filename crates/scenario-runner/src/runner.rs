//! The per-scenario state machine and suite driver.

use crate::scenario::{Outcome, Scenario, ScenarioResult, Stage};
use rayon::prelude::*;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, info, warn};
use zkfence_circuit::{proximity, CompiledCircuit};
use zkfence_common::{
    CircuitInputs, Error, Proof, ProvingKey, PublicSignals, Result, VerificationKey,
    WitnessOutcome,
};
use zkfence_prover::{prove, setup, write_witness_file, WitnessGenerator};
use zkfence_verifier::verify;

/// Everything one pipeline pass needs, threaded explicitly through each run:
/// the shared read-only circuit and keys, plus an optional deadline around
/// circuit evaluation and proving. Safe to share across scenario workers.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    circuit: CompiledCircuit,
    proving_key: ProvingKey,
    verification_key: VerificationKey,
    deadline: Option<Duration>,
}

impl ScenarioContext {
    /// Provision an in-memory context from the bundled proximity artifact
    /// with a fresh key pair.
    pub fn provision() -> Result<Self> {
        let circuit = CompiledCircuit::decode(&proximity::artifact_bytes())?;
        let (proving_key, verification_key) = setup(&circuit, &mut rand::thread_rng());
        Ok(Self {
            circuit,
            proving_key,
            verification_key,
            deadline: None,
        })
    }

    /// Load a context from artifact files produced by earlier invocations.
    pub fn load(
        circuit_path: &std::path::Path,
        proving_key_path: &std::path::Path,
        verification_key_path: &std::path::Path,
    ) -> Result<Self> {
        Ok(Self {
            circuit: CompiledCircuit::load(circuit_path)?,
            proving_key: ProvingKey::load(proving_key_path)?,
            verification_key: VerificationKey::load(verification_key_path)?,
            deadline: None,
        })
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn circuit(&self) -> &CompiledCircuit {
        &self.circuit
    }

    pub fn verification_key(&self) -> &VerificationKey {
        &self.verification_key
    }
}

/// What the deadline-guarded portion of the pipeline produced.
enum Staged {
    WitnessFailed(String),
    Proved(Proof, PublicSignals),
}

/// Run one scenario through the full state machine and report the result.
/// Fatal errors are isolated: they mark this scenario unsuccessful but never
/// propagate to the caller.
pub fn run_scenario(ctx: &ScenarioContext, scenario: &Scenario) -> ScenarioResult {
    let distance_squared = scenario.distance_squared();
    debug!(scenario = %scenario.name, stage = %Stage::Pending, "scenario starting");

    let inputs = match scenario.assemble() {
        Ok(inputs) => inputs,
        Err(e) => {
            return report(scenario, CircuitInputs::default(), Stage::Pending, Outcome::Fail,
                distance_squared, Some(e.to_string()));
        }
    };
    debug!(scenario = %scenario.name, stage = %Stage::InputAssembled, "inputs assembled");

    let workdir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            return report(scenario, inputs, Stage::InputAssembled, Outcome::Fail,
                distance_squared, Some(e.to_string()));
        }
    };

    debug!(scenario = %scenario.name, stage = %Stage::WitnessAttempted, "computing witness");
    let staged = attempt_staged(ctx, &inputs, workdir.path().join("witness.wtns"));

    let (stage, actual, error) = match staged {
        Ok(Staged::WitnessFailed(constraint)) => {
            info!(scenario = %scenario.name, %constraint, "witness generation failed as a pipeline outcome");
            (Stage::WitnessFailed, Outcome::Fail, None)
        }
        Ok(Staged::Proved(proof, signals)) => {
            debug!(scenario = %scenario.name, stage = %Stage::Proved, "proof generated");
            match verify(&ctx.verification_key, &signals, &proof) {
                Ok(true) => (Stage::Verified, Outcome::Pass, None),
                Ok(false) => (Stage::Verified, Outcome::Fail, None),
                Err(e) => (Stage::Proved, Outcome::Fail, Some(e.to_string())),
            }
        }
        Err(e) => {
            warn!(scenario = %scenario.name, error = %e, "scenario failed with a system error");
            (Stage::WitnessAttempted, Outcome::Fail, Some(e.to_string()))
        }
    };

    report(scenario, inputs, stage, actual, distance_squared, error)
}

/// The deadline-guarded stages: witness computation, witness persistence and
/// proving. Verification stays outside the guard; it is constant-cost.
fn attempt_staged(
    ctx: &ScenarioContext,
    inputs: &CircuitInputs,
    witness_path: PathBuf,
) -> Result<Staged> {
    let circuit = ctx.circuit.clone();
    let proving_key = ctx.proving_key.clone();
    let inputs = inputs.clone();
    with_deadline(ctx.deadline, move || -> Result<Staged> {
        let generator = WitnessGenerator::new(&circuit)?;
        match generator.compute(&inputs)? {
            WitnessOutcome::Unsatisfiable { constraint } => Ok(Staged::WitnessFailed(constraint)),
            WitnessOutcome::Satisfied(witness) => {
                write_witness_file(&witness, &witness_path)?;
                let (proof, signals) = prove(&witness, &proving_key)?;
                Ok(Staged::Proved(proof, signals))
            }
        }
    })?
}

/// Run a closure with an optional wall-clock limit. On expiry the worker
/// thread is abandoned and its eventual result discarded.
fn with_deadline<T, F>(deadline: Option<Duration>, task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let Some(limit) = deadline else {
        return Ok(task());
    };
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(task());
    });
    match rx.recv_timeout(limit) {
        Ok(value) => Ok(value),
        Err(mpsc::RecvTimeoutError::Timeout) => Err(Error::DeadlineExceeded(limit)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(Error::Other(anyhow::anyhow!(
            "pipeline worker terminated unexpectedly"
        ))),
    }
}

fn report(
    scenario: &Scenario,
    inputs: CircuitInputs,
    stage: Stage,
    actual: Outcome,
    distance_squared: u128,
    error: Option<String>,
) -> ScenarioResult {
    let success = error.is_none() && actual == scenario.expected;
    info!(
        scenario = %scenario.name,
        expected = %scenario.expected,
        %actual,
        distance_squared,
        success,
        "scenario reported"
    );
    ScenarioResult {
        name: scenario.name.clone(),
        inputs,
        expected: scenario.expected,
        actual,
        distance_squared,
        stage,
        error,
        success,
    }
}

/// Run a batch of scenarios, sequentially or across worker threads. Each
/// scenario uses its own temp directory, so parallel runs never collide on
/// artifacts; circuit and keys are shared read-only.
pub fn run_suite(
    ctx: &ScenarioContext,
    scenarios: &[Scenario],
    parallel: bool,
) -> Vec<ScenarioResult> {
    if parallel {
        scenarios
            .par_iter()
            .map(|scenario| run_scenario(ctx, scenario))
            .collect()
    } else {
        scenarios
            .iter()
            .map(|scenario| run_scenario(ctx, scenario))
            .collect()
    }
}

/// Human-readable suite report.
pub fn render_report(results: &[ScenarioResult]) -> String {
    let mut out = String::new();
    for result in results {
        let marker = if result.success { "ok " } else { "MISMATCH" };
        let _ = write!(
            out,
            "{marker} {}: expected {}, actual {} (distance^2 = {}, stage {})",
            result.name, result.expected, result.actual, result.distance_squared, result.stage
        );
        if let Some(error) = &result.error {
            let _ = write!(out, " [error: {error}]");
        }
        out.push('\n');
    }
    let matched = results.iter().filter(|r| r.success).count();
    let _ = writeln!(out, "{matched} of {} scenarios matched expectations", results.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::builtin_scenarios;

    #[test]
    fn test_builtin_suite_matches_expectations() {
        let ctx = ScenarioContext::provision().unwrap();
        let results = run_suite(&ctx, &builtin_scenarios(), false);
        assert_eq!(results.len(), 6);
        for result in &results {
            assert!(result.success, "scenario '{}' failed: {:?}", result.name, result.error);
            assert!(result.error.is_none());
        }
    }

    #[test]
    fn test_out_of_zone_scenario_stops_at_witness() {
        let ctx = ScenarioContext::provision().unwrap();
        let scenario = Scenario {
            name: "far-away".into(),
            user_x: 300,
            user_y: 300,
            center_x: 0,
            center_y: 0,
            max_distance_squared: 50_000,
            expected: Outcome::Fail,
        };
        let result = run_scenario(&ctx, &scenario);
        assert_eq!(result.stage, Stage::WitnessFailed);
        assert_eq!(result.actual, Outcome::Fail);
        assert!(result.success);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parallel_suite_agrees_with_sequential() {
        let ctx = ScenarioContext::provision().unwrap();
        let scenarios = builtin_scenarios();
        let sequential = run_suite(&ctx, &scenarios, false);
        let parallel = run_suite(&ctx, &scenarios, true);
        let verdicts = |results: &[ScenarioResult]| {
            results
                .iter()
                .map(|r| (r.name.clone(), r.actual, r.success))
                .collect::<Vec<_>>()
        };
        assert_eq!(verdicts(&sequential), verdicts(&parallel));
    }

    #[test]
    fn test_generous_deadline_does_not_trip() {
        let ctx = ScenarioContext::provision()
            .unwrap()
            .with_deadline(Some(Duration::from_secs(30)));
        let results = run_suite(&ctx, &builtin_scenarios(), false);
        assert!(results.iter().all(|r| r.success));
    }

    #[test]
    fn test_mismatched_expectation_is_reported() {
        let ctx = ScenarioContext::provision().unwrap();
        let scenario = Scenario {
            name: "wrong-expectation".into(),
            user_x: 0,
            user_y: 0,
            center_x: 0,
            center_y: 0,
            max_distance_squared: 50_000,
            expected: Outcome::Fail,
        };
        let result = run_scenario(&ctx, &scenario);
        assert_eq!(result.actual, Outcome::Pass);
        assert!(!result.success);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_report_rendering() {
        let ctx = ScenarioContext::provision().unwrap();
        let results = run_suite(&ctx, &builtin_scenarios(), false);
        let report = render_report(&results);
        assert!(report.contains("within-zone"));
        assert!(report.contains("6 of 6 scenarios matched expectations"));
    }
}
