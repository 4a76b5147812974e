//! `qsim consensus` — random bits anchored by a proof receipt.

use anyhow::Result;

use qsim_core::checked_count;

use super::Session;
use crate::ledger::{LocalLedger, ProofLedger, consensus_random};

pub fn run(session: &mut Session, bits: i64, topic: &str) -> Result<()> {
    let bits = checked_count(bits)?;
    let mut ledger = LocalLedger::new(topic);
    let report = consensus_random(&session.engine, &mut session.stats, &mut ledger, bits)?;

    session.emit(&report, || {
        println!("Random ({} bits): {}", report.random.random_bits, report.random.random_hex);
        println!("Entropy:          {:.4} bits/bit", report.random.entropy);
        println!("Topic:            {topic}");
        println!("Transaction:      {}", report.ledger_transaction);
        println!("Proof hash:       {}", report.consensus_proof);
        println!("Receipts held:    {}", ledger.submissions().len());
    })
}
