pub mod bench;
pub mod circuit;
pub mod consensus;
pub mod demo;
pub mod hybrid;
pub mod key;
pub mod ml;
pub mod random;

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::warn;
use serde::Serialize;

use qsim_core::{
    BitSource, Circuit, CircuitFile, Gate, OsBitSource, SeededBitSource, ThreadRngSource,
};

use crate::engine::{Engine, EngineStats};

/// Engine plus the counters and output mode for one CLI invocation.
pub struct Session {
    pub engine: Engine,
    pub stats: EngineStats,
    pub json: bool,
}

impl Session {
    /// Print a report as pretty JSON, or run `human` to print a summary.
    pub fn emit<T: Serialize>(&self, report: &T, human: impl FnOnce()) -> Result<()> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(report).context("serializing report")?
            );
        } else {
            human();
        }
        Ok(())
    }
}

/// Build a bit source by name.
pub fn make_source(name: &str, seed: Option<u64>) -> Box<dyn BitSource> {
    match name {
        "prng" => Box::new(ThreadRngSource),
        "os" => Box::new(OsBitSource),
        "seeded" => {
            let seed = seed.unwrap_or_else(|| {
                warn!("--source seeded given without --seed, using seed 0");
                0
            });
            Box::new(SeededBitSource::new(seed))
        }
        _ => {
            warn!("unknown bit source '{name}', using prng");
            Box::new(ThreadRngSource)
        }
    }
}

/// Parse a gate list like `H:0,X:1,CNOT:0-1`.
pub fn parse_gates(spec: &str) -> Result<Vec<Gate>> {
    let mut gates = Vec::new();
    for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((name, args)) = item.split_once(':') else {
            bail!("gate '{item}' must look like NAME:QUBIT");
        };
        let qubit = |s: &str| -> Result<usize> {
            s.trim()
                .parse()
                .with_context(|| format!("bad qubit index in gate '{item}'"))
        };
        let gate = match name.trim().to_ascii_uppercase().as_str() {
            "H" => Gate::H(qubit(args)?),
            "X" => Gate::X(qubit(args)?),
            "CNOT" | "CX" => {
                let Some((c, t)) = args.split_once('-') else {
                    bail!("CNOT gate '{item}' must look like CNOT:CONTROL-TARGET");
                };
                Gate::Cnot(qubit(c)?, qubit(t)?)
            }
            other => bail!("unknown gate '{other}' (expected H, X or CNOT)"),
        };
        gates.push(gate);
    }
    Ok(gates)
}

/// Parse a comma-separated list of numbers.
pub fn parse_values(spec: &str) -> Result<Vec<f64>> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("'{s}' is not a number"))
        })
        .collect()
}

/// Load a circuit description from a JSON file. A file without
/// `num_qubits` gets `default_width`.
pub fn load_circuit(path: &Path, default_width: usize) -> Result<Circuit> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading circuit file {}", path.display()))?;
    let file: CircuitFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing circuit file {}", path.display()))?;
    Ok(file.into_circuit(default_width))
}
