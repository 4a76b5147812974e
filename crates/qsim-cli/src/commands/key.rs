//! `qsim key` — derive a key with the simplified two-basis protocol.

use anyhow::Result;

use qsim_core::checked_qubits;

use super::Session;

pub fn run(session: &mut Session, bits: i64) -> Result<()> {
    let bits = checked_qubits(bits)?;
    let report = session.engine.generate_key(&mut session.stats, bits)?;

    session.emit(&report, || {
        let key = &report.key;
        println!("Protocol:    {}", key.protocol);
        println!("Key size:    {} bits", key.key_size_bits);
        println!("Key:         {}", key.key_hex);
        println!("Bases used:  {}", key.bases_used);
        println!("Raw entropy: {:.4} bits/bit ({})", key.raw_entropy, key.source);
        println!("\nBasis labels are tallied for reporting only; they do not filter key bits.");
    })
}
