//! Error taxonomy for the measurement engine.
//!
//! Every core operation fails fast with one of these kinds. Nothing is
//! retried, clamped, or partially returned.

use thiserror::Error;

/// Errors signalled by core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("bit count must be non-negative, got {0}")]
    InvalidCount(i64),

    #[error("shot count must be positive, got {0}")]
    InvalidShotCount(i64),

    #[error("qubit count must be positive, got {0}")]
    InvalidQubitCount(i64),

    #[error("bit value {value} at index {index} is not 0 or 1")]
    InvalidBit { index: usize, value: u8 },

    #[error("outcome '{outcome}' is not a {qubits}-qubit bitstring")]
    InvalidOutcome { outcome: String, qubits: usize },

    #[error("gate {gate} targets qubit {qubit}, circuit has {num_qubits}")]
    GateOutOfRange {
        gate: usize,
        qubit: usize,
        num_qubits: usize,
    },

    #[error("cannot merge {left}-qubit and {right}-qubit measurements")]
    QubitMismatch { left: usize, right: usize },
}

/// Result alias used across the core.
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        assert_eq!(
            SimError::InvalidShotCount(0).to_string(),
            "shot count must be positive, got 0"
        );
        assert_eq!(
            SimError::InvalidBit { index: 3, value: 2 }.to_string(),
            "bit value 2 at index 3 is not 0 or 1"
        );
    }
}
