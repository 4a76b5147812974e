//! Shot aggregation: sample one outcome bitstring per shot and tally.
//!
//! Results are sparse. An outcome that never occurred is absent from both
//! maps rather than present with probability zero. Partial results with the
//! same width combine additively through [`MeasurementOutcome::merge`], which
//! is how [`aggregate_parallel`] joins its workers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::source::BitSource;

/// Default shot count for a circuit that does not declare one.
pub const DEFAULT_SHOTS: usize = 1024;

// ---------------------------------------------------------------------------
// Circuit description
// ---------------------------------------------------------------------------

/// A gate in a circuit description.
///
/// Gates only contribute to the reported depth. No state evolution is
/// modelled, so every measured bit stays uniform regardless of the gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard on one qubit.
    H(usize),
    /// Pauli-X on one qubit.
    X(usize),
    /// Controlled-NOT: (control, target).
    #[serde(rename = "CNOT")]
    Cnot(usize, usize),
}

impl Gate {
    fn qubits(&self) -> Vec<usize> {
        match *self {
            Self::H(q) | Self::X(q) => vec![q],
            Self::Cnot(c, t) => vec![c, t],
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::H(q) => write!(f, "H({q})"),
            Self::X(q) => write!(f, "X({q})"),
            Self::Cnot(c, t) => write!(f, "CNOT({c},{t})"),
        }
    }
}

fn default_shots() -> usize {
    DEFAULT_SHOTS
}

/// Circuit to sample: width, gate list, and shot count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circuit {
    pub num_qubits: usize,
    pub gates: Vec<Gate>,
    pub shots: usize,
}

/// Circuit as written in a JSON description. The width may be left out and
/// filled in by the caller's configured register width.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CircuitFile {
    #[serde(default)]
    pub num_qubits: Option<usize>,
    #[serde(default)]
    pub gates: Vec<Gate>,
    #[serde(default = "default_shots")]
    pub shots: usize,
}

impl CircuitFile {
    /// Resolve into a [`Circuit`], using `default_width` when no width was given.
    pub fn into_circuit(self, default_width: usize) -> Circuit {
        Circuit {
            num_qubits: self.num_qubits.unwrap_or(default_width),
            gates: self.gates,
            shots: self.shots,
        }
    }
}

impl Circuit {
    /// Empty circuit with the default shot count.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            shots: DEFAULT_SHOTS,
        }
    }

    /// A Hadamard on each of the first `n` qubits.
    pub fn hadamard_layer(num_qubits: usize, n: usize) -> Self {
        Self::new(num_qubits).with_gates((0..n).map(Gate::H).collect())
    }

    pub fn with_gates(mut self, gates: Vec<Gate>) -> Self {
        self.gates = gates;
        self
    }

    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Depth as reported to callers: one layer per gate.
    pub fn depth(&self) -> usize {
        self.gates.len()
    }

    /// Check width, shot count, and that every gate addresses a real qubit.
    pub fn validate(&self) -> Result<()> {
        if self.num_qubits == 0 {
            return Err(SimError::InvalidQubitCount(0));
        }
        if self.shots == 0 {
            return Err(SimError::InvalidShotCount(0));
        }
        for (gate, g) in self.gates.iter().enumerate() {
            if let Some(&qubit) = g.qubits().iter().find(|&&q| q >= self.num_qubits) {
                return Err(SimError::GateOutOfRange {
                    gate,
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Measurement outcome
// ---------------------------------------------------------------------------

/// Tallies and probabilities of observed outcome bitstrings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementOutcome {
    /// Width of every outcome string.
    pub qubit_count: usize,
    /// Sum of all tallies.
    pub shots: u64,
    /// Outcome bitstring → occurrence count. Only observed outcomes.
    pub counts: BTreeMap<String, u64>,
    /// Outcome bitstring → count / shots.
    pub probabilities: BTreeMap<String, f64>,
}

impl MeasurementOutcome {
    /// Build from explicit tallies.
    ///
    /// Keys must be `qubit_count`-wide strings of `'0'`/`'1'`. Zero tallies
    /// are dropped. An empty map gives an empty outcome with zero shots.
    pub fn from_counts(qubit_count: usize, counts: BTreeMap<String, u64>) -> Result<Self> {
        for outcome in counts.keys() {
            let well_formed = outcome.len() == qubit_count
                && outcome.bytes().all(|b| b == b'0' || b == b'1');
            if !well_formed {
                return Err(SimError::InvalidOutcome {
                    outcome: outcome.clone(),
                    qubits: qubit_count,
                });
            }
        }
        let counts: BTreeMap<String, u64> = counts.into_iter().filter(|(_, c)| *c > 0).collect();
        let shots: u64 = counts.values().sum();
        let probabilities = counts
            .iter()
            .map(|(k, &c)| (k.clone(), c as f64 / shots as f64))
            .collect();
        Ok(Self {
            qubit_count,
            shots,
            counts,
            probabilities,
        })
    }

    /// Number of distinct outcomes observed.
    pub fn distinct_outcomes(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Tally for `outcome`, zero if never observed.
    pub fn count(&self, outcome: &str) -> u64 {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    /// Probability of `outcome`, zero if never observed.
    pub fn probability(&self, outcome: &str) -> f64 {
        self.probabilities.get(outcome).copied().unwrap_or(0.0)
    }

    /// Most frequent outcome (lowest bitstring on ties).
    pub fn most_likely(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, &c)| (k.as_str(), c))
    }

    /// Combine two partial tallies of the same width.
    pub fn merge(self, other: Self) -> Result<Self> {
        if self.qubit_count != other.qubit_count {
            return Err(SimError::QubitMismatch {
                left: self.qubit_count,
                right: other.qubit_count,
            });
        }
        let mut counts = self.counts;
        for (outcome, c) in other.counts {
            *counts.entry(outcome).or_insert(0) += c;
        }
        Self::from_counts(self.qubit_count, counts)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Validate a signed shot-count request.
pub fn checked_shots(shots: i64) -> Result<usize> {
    match usize::try_from(shots) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SimError::InvalidShotCount(shots)),
    }
}

/// Validate a signed qubit-count (or key-size) request.
pub fn checked_qubits(qubits: i64) -> Result<usize> {
    match usize::try_from(qubits) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SimError::InvalidQubitCount(qubits)),
    }
}

/// Sample `shots` outcomes of `qubit_count` bits each and tally them.
pub fn aggregate(
    source: &dyn BitSource,
    qubit_count: usize,
    shots: usize,
) -> Result<MeasurementOutcome> {
    if qubit_count == 0 {
        return Err(SimError::InvalidQubitCount(0));
    }
    if shots == 0 {
        return Err(SimError::InvalidShotCount(0));
    }
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for _ in 0..shots {
        let outcome = source.generate(qubit_count).to_bitstring();
        *counts.entry(outcome).or_insert(0) += 1;
    }
    MeasurementOutcome::from_counts(qubit_count, counts)
}

/// Threads [`aggregate_parallel`] actually spawns for a request: at least one,
/// at most one per shot, and never more than the machine's parallelism.
pub fn worker_count(requested: usize, shots: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.min(cores).clamp(1, shots.max(1))
}

/// Like [`aggregate`], but splits the shots over up to `workers` scoped
/// threads and merges their partial tallies. See [`worker_count`].
pub fn aggregate_parallel(
    source: &dyn BitSource,
    qubit_count: usize,
    shots: usize,
    workers: usize,
) -> Result<MeasurementOutcome> {
    if qubit_count == 0 {
        return Err(SimError::InvalidQubitCount(0));
    }
    if shots == 0 {
        return Err(SimError::InvalidShotCount(0));
    }
    let workers = worker_count(workers, shots);
    let base = shots / workers;
    let extra = shots % workers;

    let partials: Vec<Result<MeasurementOutcome>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                let share = base + usize::from(w < extra);
                s.spawn(move || aggregate(source, qubit_count, share))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });

    let mut merged = MeasurementOutcome::from_counts(qubit_count, BTreeMap::new())?;
    for partial in partials {
        merged = merged.merge(partial?)?;
    }
    Ok(merged)
}

/// Validate a circuit and sample it.
pub fn run_circuit(source: &dyn BitSource, circuit: &Circuit) -> Result<MeasurementOutcome> {
    circuit.validate()?;
    aggregate(source, circuit.num_qubits, circuit.shots)
}
