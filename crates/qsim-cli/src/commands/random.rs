//! `qsim random` — draw measured bits and print them packed as hex.

use anyhow::Result;

use qsim_core::checked_count;

use super::Session;

pub fn run(session: &mut Session, bits: i64) -> Result<()> {
    let bits = checked_count(bits)?;
    let report = session.engine.generate_random(&mut session.stats, bits);

    session.emit(&report, || {
        println!("Random bits:   {}", report.random_bits);
        println!("Hex:           {}", report.random_hex);
        println!("Entropy:       {:.4} bits/bit", report.entropy);
        println!("Circuit depth: {}", report.circuit_depth);
        println!(
            "Time:          {:.3}ms ({})",
            report.generation_time_ms, report.backend
        );
    })
}
