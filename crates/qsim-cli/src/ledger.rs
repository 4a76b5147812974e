//! Proof submission: hand a result record to a ledger, get a receipt back.
//!
//! The ledger is a collaborator behind the [`ProofLedger`] trait. The only
//! implementation here, [`LocalLedger`], keeps receipts in memory and issues
//! transaction ids locally; it does not talk to any network.

use anyhow::{Context, Result};
use log::info;
use rand::Rng;
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use qsim_core::hex_encode;

use crate::clock::{now_iso8601, since_epoch};
use crate::engine::{Engine, EngineStats, RandomReport};

/// Default topic proofs are filed under.
pub const DEFAULT_TOPIC: &str = "quantum-proofs";

/// Receipt for a submitted proof.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Lowercase hex SHA-256 of the canonical JSON record.
    pub proof_hash: String,
    pub proof_data: Value,
    pub topic: String,
    pub transaction_id: String,
    pub submitted: String,
}

/// Anything that accepts result records and returns receipts.
pub trait ProofLedger {
    fn submit(&mut self, proof: Value) -> Result<Receipt>;

    /// Receipts issued so far, oldest first.
    fn submissions(&self) -> &[Receipt];
}

/// SHA-256 of the record's canonical JSON (object keys sorted).
pub fn proof_hash(proof: &Value) -> Result<String> {
    let canonical = serde_json::to_vec(proof).context("serializing proof record")?;
    Ok(hex_encode(&Sha256::digest(&canonical)))
}

/// In-memory ledger.
#[derive(Debug)]
pub struct LocalLedger {
    topic: String,
    submissions: Vec<Receipt>,
}

impl LocalLedger {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            submissions: Vec::new(),
        }
    }

    /// Transaction id of the form `0.0.<account>@<unix seconds>`.
    fn next_transaction_id(&self) -> String {
        let account: u32 = rand::rng().random_range(100_000..=999_999);
        format!("0.0.{account}@{}", since_epoch().as_secs())
    }
}

impl Default for LocalLedger {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC)
    }
}

impl ProofLedger for LocalLedger {
    fn submit(&mut self, proof: Value) -> Result<Receipt> {
        let receipt = Receipt {
            proof_hash: proof_hash(&proof)?,
            proof_data: proof,
            topic: self.topic.clone(),
            transaction_id: self.next_transaction_id(),
            submitted: now_iso8601(),
        };
        info!(
            "proof submitted: transaction {} hash {}...",
            receipt.transaction_id,
            &receipt.proof_hash[..16]
        );
        self.submissions.push(receipt.clone());
        Ok(receipt)
    }

    fn submissions(&self) -> &[Receipt] {
        &self.submissions
    }
}

/// Random generation anchored by a ledger receipt.
#[derive(Debug, Clone, Serialize)]
pub struct ConsensusReport {
    #[serde(flatten)]
    pub random: RandomReport,
    pub consensus_proof: String,
    pub ledger_transaction: String,
}

/// Generate random bits and submit a proof of them.
pub fn consensus_random(
    engine: &Engine,
    stats: &mut EngineStats,
    ledger: &mut dyn ProofLedger,
    num_bits: usize,
) -> Result<ConsensusReport> {
    let random = engine.generate_random(stats, num_bits);
    let receipt = ledger.submit(json!({
        "type": "quantum_random",
        "random_data": random.random_hex,
        "entropy": random.entropy,
        "backend": random.backend,
    }))?;
    Ok(ConsensusReport {
        random,
        consensus_proof: receipt.proof_hash,
        ledger_transaction: receipt.transaction_id,
    })
}
