//! `qsim circuit` — sample a circuit and print its outcome distribution.

use std::path::Path;

use anyhow::Result;

use qsim_core::{Circuit, checked_qubits, checked_shots};

use super::{Session, load_circuit, parse_gates};
use crate::engine::CircuitReport;

/// Rows shown in the human-readable distribution table.
const TABLE_ROWS: usize = 16;

pub struct CircuitCommandConfig<'a> {
    pub file: Option<&'a Path>,
    pub width: Option<i64>,
    pub shots: i64,
    pub gates: Option<&'a str>,
}

/// Build the circuit from a file, or from width / gates / shots flags.
/// Without `--gates`, every qubit gets a Hadamard. A file that leaves out
/// `num_qubits` uses `--qubits`.
pub fn build_circuit(session: &Session, config: &CircuitCommandConfig<'_>) -> Result<Circuit> {
    if let Some(path) = config.file {
        return load_circuit(path, session.engine.config().num_qubits);
    }
    let width = match config.width {
        Some(w) => checked_qubits(w)?,
        None => session.engine.config().num_qubits,
    };
    let shots = checked_shots(config.shots)?;
    let circuit = match config.gates {
        Some(spec) => Circuit::new(width).with_gates(parse_gates(spec)?),
        None => Circuit::hadamard_layer(width, width),
    };
    Ok(circuit.with_shots(shots))
}

pub fn run(session: &mut Session, config: CircuitCommandConfig<'_>) -> Result<()> {
    let circuit = build_circuit(session, &config)?;
    let report = session.engine.simulate_circuit(&mut session.stats, &circuit)?;
    session.emit(&report, || print_report(&report))
}

pub(crate) fn print_report(report: &CircuitReport) {
    let m = &report.measurement;
    println!(
        "{} qubits, depth {}, {} shots, {} distinct outcomes ({:.3}ms, {})\n",
        report.num_qubits,
        report.circuit_depth,
        report.shots,
        m.distinct_outcomes(),
        report.simulation_time_ms,
        report.backend
    );

    let mut rows: Vec<_> = m.counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    println!("  {:<w$} {:>8} {:>10}", "Outcome", "Count", "P", w = report.num_qubits.max(7));
    println!("  {}", "-".repeat(report.num_qubits.max(7) + 20));
    for (outcome, count) in rows.iter().take(TABLE_ROWS) {
        println!(
            "  {:<w$} {:>8} {:>10.4}",
            outcome,
            count,
            m.probability(outcome),
            w = report.num_qubits.max(7)
        );
    }
    if rows.len() > TABLE_ROWS {
        println!("  ... {} more outcomes (use --json for all)", rows.len() - TABLE_ROWS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, EngineConfig, EngineStats};
    use qsim_core::{Gate, SimError, ThreadRngSource};

    fn session() -> Session {
        Session {
            engine: Engine::new(EngineConfig::default(), Box::new(ThreadRngSource)),
            stats: EngineStats::default(),
            json: true,
        }
    }

    fn flags(width: Option<i64>, shots: i64, gates: Option<&str>) -> CircuitCommandConfig<'_> {
        CircuitCommandConfig {
            file: None,
            width,
            shots,
            gates,
        }
    }

    #[test]
    fn test_default_width_and_hadamards() {
        let c = build_circuit(&session(), &flags(None, 100, None)).unwrap();
        assert_eq!(c.num_qubits, 16);
        assert_eq!(c.depth(), 16);
        assert_eq!(c.shots, 100);
    }

    #[test]
    fn test_explicit_gates() {
        let c = build_circuit(&session(), &flags(Some(2), 10, Some("H:0,CNOT:0-1"))).unwrap();
        assert_eq!(c.gates, vec![Gate::H(0), Gate::Cnot(0, 1)]);
    }

    #[test]
    fn test_zero_shots_rejected() {
        let err = build_circuit(&session(), &flags(Some(4), 0, None)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SimError>(),
            Some(&SimError::InvalidShotCount(0))
        );
    }

    #[test]
    fn test_negative_width_rejected() {
        let err = build_circuit(&session(), &flags(Some(-2), 10, None)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SimError>(),
            Some(&SimError::InvalidQubitCount(-2))
        );
    }

    #[test]
    fn test_file_without_width_uses_configured_qubits() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gates": [{{"X": 15}}], "shots": 12}}"#).unwrap();
        let config = CircuitCommandConfig {
            file: Some(file.path()),
            width: None,
            shots: 1024,
            gates: None,
        };
        let c = build_circuit(&session(), &config).unwrap();
        assert_eq!(c.num_qubits, 16);
        assert_eq!(c.shots, 12);

        let mut s = session();
        run(&mut s, config).unwrap();
        assert_eq!(s.stats.circuits_executed, 1);
    }

    #[test]
    fn test_run_counts_circuit() {
        let mut s = session();
        run(&mut s, flags(Some(3), 20, None)).unwrap();
        assert_eq!(s.stats.circuits_executed, 1);
    }
}
