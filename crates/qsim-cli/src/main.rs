//! CLI for qsim — a simulated quantum backend.

mod clock;
mod commands;
mod engine;
mod ledger;
mod predict;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::warn;

use commands::Session;
use engine::{Backend, Engine, EngineConfig, EngineStats};
use predict::Algorithm;

#[derive(Parser)]
#[command(name = "qsim")]
#[command(about = "qsim — simulated quantum backend: measured bits, shot statistics, two-basis keys")]
#[command(version = qsim_core::VERSION)]
struct Cli {
    /// Simulated backend (affects reported metadata and simulated speedup)
    #[arg(long, global = true, value_enum, default_value_t = Backend::NvidiaGpu)]
    backend: Backend,

    /// Default register width for circuits
    #[arg(long, global = true, default_value = "16", allow_negative_numbers = true)]
    qubits: i64,

    /// Bit source: prng (thread-local PRNG), os (OS CSPRNG), seeded (reproducible)
    #[arg(long, global = true, default_value = "prng", value_parser = ["prng", "os", "seeded"])]
    source: String,

    /// Seed for --source seeded
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Threads used to sample circuit shots (capped at available cores)
    #[arg(long, global = true, default_value = "1")]
    workers: usize,

    /// Print result records as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    /// Skip the startup banner
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw measured bits and print them packed as hex, with entropy
    Random {
        /// Number of bits to draw
        #[arg(long, default_value = "256", allow_negative_numbers = true)]
        bits: i64,
    },

    /// Sample a circuit and print its outcome distribution
    Circuit {
        /// Circuit description as JSON ({"num_qubits", "gates", "shots"})
        #[arg(long, conflicts_with_all = ["width", "gates"])]
        file: Option<PathBuf>,

        /// Register width (defaults to --qubits)
        #[arg(long, allow_negative_numbers = true)]
        width: Option<i64>,

        /// Number of shots
        #[arg(long, default_value = "1024", allow_negative_numbers = true)]
        shots: i64,

        /// Gate list, e.g. "H:0,X:1,CNOT:0-1" (default: H on every qubit)
        #[arg(long)]
        gates: Option<String>,
    },

    /// Derive a key with the simplified two-basis protocol
    Key {
        /// Key size in bits
        #[arg(long, default_value = "256", allow_negative_numbers = true)]
        bits: i64,
    },

    /// Hybrid computation: sum of values x distinct sampled outcomes
    Hybrid {
        /// Comma-separated classical values
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        values: String,

        /// Register width
        #[arg(long, default_value = "8", allow_negative_numbers = true)]
        width: i64,

        /// Number of shots
        #[arg(long, default_value = "1000", allow_negative_numbers = true)]
        shots: i64,

        /// Gate list (default: H on the first four qubits)
        #[arg(long)]
        gates: Option<String>,
    },

    /// Draw random bits and submit a proof record, printing the receipt
    Consensus {
        /// Number of bits to draw
        #[arg(long, default_value = "256", allow_negative_numbers = true)]
        bits: i64,

        /// Topic the proof is filed under
        #[arg(long, default_value = ledger::DEFAULT_TOPIC)]
        topic: String,
    },

    /// Mock quantum ML prediction over a list of features
    Ml {
        /// Comma-separated feature values
        #[arg(long, allow_hyphen_values = true)]
        values: String,

        /// Prediction rule
        #[arg(long, value_enum, default_value_t = Algorithm::Vqc)]
        algorithm: Algorithm,
    },

    /// Benchmark random generation, circuit sampling, and predictions
    Bench,

    /// Run every operation once and print a combined record
    Demo,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let workers = qsim_core::worker_count(cli.workers, usize::MAX);
    if workers < cli.workers {
        warn!("--workers {} exceeds available parallelism, using {workers}", cli.workers);
    }
    let config = EngineConfig {
        backend: cli.backend,
        num_qubits: qsim_core::checked_qubits(cli.qubits)?,
        workers,
    };
    let source = commands::make_source(&cli.source, cli.seed);
    let mut session = Session {
        engine: Engine::new(config, source),
        stats: EngineStats::default(),
        json: cli.json,
    };

    if !cli.json && !cli.quiet {
        println!("{}\n", session.engine.banner());
    }

    match cli.command {
        Commands::Random { bits } => commands::random::run(&mut session, bits),
        Commands::Circuit {
            file,
            width,
            shots,
            gates,
        } => commands::circuit::run(
            &mut session,
            commands::circuit::CircuitCommandConfig {
                file: file.as_deref(),
                width,
                shots,
                gates: gates.as_deref(),
            },
        ),
        Commands::Key { bits } => commands::key::run(&mut session, bits),
        Commands::Hybrid {
            values,
            width,
            shots,
            gates,
        } => commands::hybrid::run(&mut session, &values, width, shots, gates.as_deref()),
        Commands::Consensus { bits, topic } => {
            commands::consensus::run(&mut session, bits, &topic)
        }
        Commands::Ml { values, algorithm } => commands::ml::run(&mut session, &values, algorithm),
        Commands::Bench => commands::bench::run(&mut session),
        Commands::Demo => commands::demo::run(&mut session),
    }
}
