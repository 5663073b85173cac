//! Scenario orchestration for the proof pipeline.
//!
//! Drives assembler, witness generator, proof generator and verifier across
//! named test scenarios, comparing each pipeline outcome against the
//! scenario's expectation. Witness-generation failure is the designed FAIL
//! path for out-of-zone claims; proving and verification are never attempted
//! on a nonexistent witness.

pub mod runner;
pub mod scenario;
pub mod suite;

pub use runner::{render_report, run_scenario, run_suite, ScenarioContext};
pub use scenario::{Outcome, Scenario, ScenarioResult, Stage};
pub use suite::builtin_scenarios;
