//! `qsim hybrid` — classical sum scaled by the sampled outcome diversity.

use anyhow::Result;

use qsim_core::{Circuit, checked_qubits, checked_shots};

use super::{Session, parse_gates, parse_values};

/// Hadamards placed on the first qubits when no gates are given.
const DEFAULT_HADAMARDS: usize = 4;

pub fn run(
    session: &mut Session,
    values: &str,
    width: i64,
    shots: i64,
    gates: Option<&str>,
) -> Result<()> {
    let values = parse_values(values)?;
    let width = checked_qubits(width)?;
    let shots = checked_shots(shots)?;
    let circuit = match gates {
        Some(spec) => Circuit::new(width).with_gates(parse_gates(spec)?),
        None => Circuit::hadamard_layer(width, DEFAULT_HADAMARDS.min(width)),
    }
    .with_shots(shots);

    let report = session
        .engine
        .hybrid(&mut session.stats, &values, &circuit)?;

    session.emit(&report, || {
        let q = &report.quantum_component;
        println!("Classical component: {}", report.classical_component);
        println!(
            "Quantum component:   {} distinct outcomes over {} shots ({} qubits)",
            q.measurement.distinct_outcomes(),
            q.shots,
            q.num_qubits
        );
        println!("Hybrid value:        {}", report.hybrid_value);
        println!(
            "Optimization:        {} (speedup x{})",
            report.optimization, report.speedup_factor
        );
    })
}
