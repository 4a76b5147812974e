//! # qsim-core
//!
//! **A quantum backend's outputs, without the quantum backend.**
//!
//! `qsim-core` is the measurement engine behind `qsim`. It synthesizes the
//! bits a register of equal-superposition qubits would yield, packs them to
//! bytes and hex, estimates their entropy, tallies repeated shots into
//! outcome distributions, and runs a simplified two-basis key derivation.
//!
//! ## Quick Start
//!
//! ```
//! use qsim_core::{BitSource, ThreadRngSource, aggregate, derive_key, entropy, pack};
//!
//! let source = ThreadRngSource;
//!
//! let bits = source.generate(256);
//! let encoding = pack(&bits);
//! assert_eq!(encoding.hex.len(), 64);
//! assert!((0.0..=1.0).contains(&entropy(&bits)));
//!
//! let counts = aggregate(&source, 4, 1000).unwrap();
//! assert_eq!(counts.shots, 1000);
//!
//! let key = derive_key(&source, 256).unwrap();
//! assert_eq!(key.key_hex.len(), 64);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! BitSource → pack / entropy → derive_key
//! BitSource → aggregate → combine
//! ```
//!
//! Every operation is a pure function of its inputs and the source it is
//! handed. Nothing here logs, prints, or keeps counters; that belongs to the
//! caller.

pub mod bits;
pub mod entropy;
pub mod error;
pub mod hybrid;
pub mod key;
pub mod measurement;
pub mod packing;
pub mod source;

pub use bits::{BitSequence, checked_count};
pub use entropy::{BitBalance, entropy};
pub use error::{Result, SimError};
pub use hybrid::{HybridResult, classical_sum, combine};
pub use key::{Basis, KeyMaterial, PROTOCOL, derive_key};
pub use measurement::{
    Circuit, CircuitFile, DEFAULT_SHOTS, Gate, MeasurementOutcome, aggregate,
    aggregate_parallel, checked_qubits, checked_shots, run_circuit, worker_count,
};
pub use packing::{ByteEncoding, hex_encode, pack};
pub use source::{BitSource, OsBitSource, SeededBitSource, SourceInfo, ThreadRngSource};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
