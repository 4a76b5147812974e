//! `qsim bench` — time fixed batches of random generation, sampling, and
//! predictions.

use anyhow::Result;

use super::Session;

pub fn run(session: &mut Session) -> Result<()> {
    if !session.json {
        println!(
            "Running benchmarks (10 x 256-bit random, 5 x 10-qubit circuits, 10 predictions)...\n"
        );
    }
    let report = session.engine.benchmark(&mut session.stats)?;
    let stats = session.engine.statistics(&session.stats);

    session.emit(&serde_json::json!({ "benchmarks": report, "statistics": stats }), || {
        println!("{}", "=".repeat(48));
        println!("{:<30} {:>16}", "Benchmark", "Time");
        println!("{}", "-".repeat(48));
        println!(
            "{:<30} {:>15.3}s",
            "Random gen (10x256)", report.random_generation_10x256bits
        );
        println!(
            "{:<30} {:>15.3}s",
            "Circuit sim (5x10q)", report.circuit_simulation_5x10qubits
        );
        println!(
            "{:<30} {:>15.3}s",
            "ML predictions (10x)", report.ml_predictions_10x
        );
        println!("{:<30} {:>16}", "GPU speedup", report.gpu_speedup);
        println!(
            "\n{} runs, {} random bits on {}.",
            stats.circuits_executed, stats.total_random_bits, stats.backend
        );
        println!("Times are wall-clock for the whole batch, before any backend scaling.");
    })
}
