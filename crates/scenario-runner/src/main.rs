//! zkfence CLI
//!
//! Command surface over the proof pipeline: export the bundled circuit
//! artifact, run setup, compute witnesses, prove, verify, and drive the
//! built-in scenario suite.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use zkfence_circuit::{proximity, CompiledCircuit};
use zkfence_common::{CircuitInputs, Proof, ProvingKey, PublicSignals, VerificationKey};
use zkfence_prover::{prove, read_witness_file, setup, write_witness_file, WitnessGenerator};
use zkfence_scenario_runner::{builtin_scenarios, render_report, run_suite, ScenarioContext};
use zkfence_verifier::verify;

#[derive(Parser)]
#[command(name = "zkfence")]
#[command(about = "Location-proximity zero-knowledge proof pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the bundled proximity circuit artifact to a file
    ExportCircuit {
        /// Output path for the circuit artifact
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a proving/verification key pair for a compiled circuit
    Setup {
        /// Compiled circuit artifact
        #[arg(short, long)]
        circuit: PathBuf,
        /// Output path for the proving key
        #[arg(long)]
        proving_key: PathBuf,
        /// Output path for the verification key (JSON)
        #[arg(long)]
        verification_key: PathBuf,
    },

    /// Compute a witness for an input file
    Witness {
        /// Compiled circuit artifact
        #[arg(short, long)]
        circuit: PathBuf,
        /// Input signal map (JSON)
        #[arg(short, long)]
        input: PathBuf,
        /// Output path for the binary witness
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a proof from a witness file
    Prove {
        /// Compiled circuit artifact
        #[arg(short, long)]
        circuit: PathBuf,
        /// Binary witness file
        #[arg(short, long)]
        witness: PathBuf,
        /// Proving key
        #[arg(long)]
        proving_key: PathBuf,
        /// Output path for the proof (JSON)
        #[arg(long)]
        proof: PathBuf,
        /// Output path for the public signals (JSON)
        #[arg(long)]
        public: PathBuf,
    },

    /// Verify a proof against its public signals
    Verify {
        /// Verification key (JSON)
        #[arg(long)]
        verification_key: PathBuf,
        /// Public signals (JSON)
        #[arg(long)]
        public: PathBuf,
        /// Proof (JSON)
        #[arg(long)]
        proof: PathBuf,
    },

    /// Run the built-in scenario suite end to end
    RunScenarios {
        /// Run scenarios across worker threads
        #[arg(long)]
        parallel: bool,
        /// Deadline around circuit evaluation and proving, per scenario
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run(Cli::parse()) {
        // Expected failures (rejected claims, bad input maps) get a concise
        // one-liner; anything else gets the full error chain.
        match err.downcast_ref::<zkfence_common::Error>() {
            Some(e) if e.is_expected_failure() => eprintln!("error: {e}"),
            _ => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::ExportCircuit { output } => {
            std::fs::write(&output, proximity::artifact_bytes())
                .with_context(|| format!("cannot write {}", output.display()))?;
            println!("circuit artifact written to {}", output.display());
        }

        Commands::Setup {
            circuit,
            proving_key,
            verification_key,
        } => {
            let circuit = CompiledCircuit::load(&circuit)
                .with_context(|| format!("cannot load circuit {}", circuit.display()))?;
            let (pk, vk) = setup(&circuit, &mut rand::thread_rng());
            pk.store(&proving_key)
                .with_context(|| format!("cannot write {}", proving_key.display()))?;
            vk.store(&verification_key)
                .with_context(|| format!("cannot write {}", verification_key.display()))?;
            println!(
                "keys generated for circuit '{}' ({})",
                circuit.name(),
                circuit.circuit_id()
            );
        }

        Commands::Witness {
            circuit,
            input,
            output,
        } => {
            let circuit = CompiledCircuit::load(&circuit)
                .with_context(|| format!("cannot load circuit {}", circuit.display()))?;
            let bytes = std::fs::read(&input)
                .with_context(|| format!("cannot read input file {}", input.display()))?;
            let inputs = CircuitInputs::from_json_slice(&bytes)
                .with_context(|| format!("malformed input file {}", input.display()))?;
            let generator = WitnessGenerator::new(&circuit)?;
            let witness = generator.compute(&inputs)?.into_result()?;
            write_witness_file(&witness, &output)?;
            println!("witness written to {}", output.display());
        }

        Commands::Prove {
            circuit,
            witness,
            proving_key,
            proof,
            public,
        } => {
            let circuit = CompiledCircuit::load(&circuit)
                .with_context(|| format!("cannot load circuit {}", circuit.display()))?;
            let pk = ProvingKey::load(&proving_key)
                .with_context(|| format!("cannot load proving key {}", proving_key.display()))?;
            let witness = read_witness_file(&witness, &circuit)?;
            let (generated, signals) = prove(&witness, &pk)?;
            generated
                .store(&proof)
                .with_context(|| format!("cannot write {}", proof.display()))?;
            signals
                .store(&public)
                .with_context(|| format!("cannot write {}", public.display()))?;
            println!(
                "proof written to {}, public signals to {}",
                proof.display(),
                public.display()
            );
        }

        Commands::Verify {
            verification_key,
            public,
            proof,
        } => {
            let vk = VerificationKey::load(&verification_key).with_context(|| {
                format!("cannot load verification key {}", verification_key.display())
            })?;
            let signals = PublicSignals::load(&public)
                .with_context(|| format!("cannot load public signals {}", public.display()))?;
            let proof = Proof::load(&proof)?;
            if verify(&vk, &signals, &proof)? {
                println!("proof is valid");
            } else {
                println!("proof rejected");
                std::process::exit(1);
            }
        }

        Commands::RunScenarios {
            parallel,
            timeout_secs,
        } => {
            let ctx = ScenarioContext::provision()?
                .with_deadline(timeout_secs.map(Duration::from_secs));
            let results = run_suite(&ctx, &builtin_scenarios(), parallel);
            print!("{}", render_report(&results));
            if results.iter().any(|r| !r.success) {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
