//! `qsim demo` — end-to-end walk-through of every engine operation.

use anyhow::Result;
use serde_json::json;

use qsim_core::Circuit;

use super::Session;
use crate::ledger::{LocalLedger, ProofLedger, consensus_random};
use crate::predict::Algorithm;

pub fn run(session: &mut Session) -> Result<()> {
    let mut ledger = LocalLedger::default();

    let consensus = consensus_random(&session.engine, &mut session.stats, &mut ledger, 256)?;

    let circuit = Circuit::hadamard_layer(8, 8).with_shots(1024);
    let circuit_report = session
        .engine
        .simulate_circuit(&mut session.stats, &circuit)?;

    let ml = session
        .engine
        .predict(&[0.5, 0.3, 0.7, 0.2, 0.9, 0.4, 0.6, 0.1], Algorithm::Vqc);

    let key = session.engine.generate_key(&mut session.stats, 256)?;

    let hybrid = session.engine.hybrid(
        &mut session.stats,
        &[0.5, 0.3, 0.7, 0.2],
        &Circuit::hadamard_layer(8, 4).with_shots(1000),
    )?;

    let stats = session.engine.statistics(&session.stats);

    let record = json!({
        "consensus_random": consensus,
        "circuit": circuit_report,
        "ml": ml,
        "key": key,
        "hybrid": hybrid,
        "statistics": stats,
        "receipts": ledger.submissions(),
    });

    session.emit(&record, || {
        let hex = &consensus.random.random_hex;
        println!("Quantum random:  {}...", &hex[..hex.len().min(32)]);
        println!("Proof hash:      {}", consensus.consensus_proof);
        println!("Transaction:     {}", consensus.ledger_transaction);
        println!();
        super::circuit::print_report(&circuit_report);
        println!();
        println!(
            "ML ({}):        {} (confidence {:.2}%)",
            ml.algorithm,
            ml.prediction,
            ml.confidence * 100.0
        );
        println!("Key ({} bits):  {}", key.key.key_size_bits, key.key.key_hex);
        println!("Bases used:      {}", key.key.bases_used);
        println!("Hybrid value:    {}", hybrid.hybrid_value);
        println!();
        println!(
            "Engine statistics: {} runs, {} random bits, backend {}, {} qubits available",
            stats.circuits_executed,
            stats.total_random_bits,
            stats.backend,
            stats.num_qubits_available
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, EngineConfig, EngineStats};
    use qsim_core::SeededBitSource;

    #[test]
    fn test_run_demo_json() {
        let mut s = Session {
            engine: Engine::new(EngineConfig::default(), Box::new(SeededBitSource::new(5))),
            stats: EngineStats::default(),
            json: true,
        };
        run(&mut s).unwrap();
        // consensus random, circuit, key, and the hybrid circuit
        assert_eq!(s.stats.circuits_executed, 4);
        assert_eq!(s.stats.total_random_bits, 512);
    }

    #[test]
    fn test_run_demo_summary() {
        let mut s = Session {
            engine: Engine::new(EngineConfig::default(), Box::new(SeededBitSource::new(5))),
            stats: EngineStats::default(),
            json: false,
        };
        run(&mut s).unwrap();
        assert_eq!(s.stats.circuits_executed, 4);
    }
}
