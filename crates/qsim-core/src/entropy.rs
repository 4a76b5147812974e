//! First-order Shannon entropy of a bit sequence.
//!
//! The estimate treats bits as independent draws with the sequence's own
//! empirical frequency. It says nothing about sequence structure: `0101...`
//! scores a perfect 1.0. Do not use it as a randomness certification.

use serde::Serialize;

use crate::bits::BitSequence;

/// Counts of ones and zeros in a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitBalance {
    pub ones: usize,
    pub zeros: usize,
}

impl BitBalance {
    pub fn of(bits: &BitSequence) -> Self {
        let ones = bits.count_ones();
        Self {
            ones,
            zeros: bits.len() - ones,
        }
    }

    pub fn total(&self) -> usize {
        self.ones + self.zeros
    }

    /// Fraction of 1-bits; 0.0 for an empty sequence.
    pub fn p_one(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.ones as f64 / self.total() as f64
    }
}

/// Normalized binary Shannon entropy in bits per bit, within [0, 1].
///
/// Empty and constant sequences yield 0.0; an exactly balanced sequence
/// yields 1.0.
pub fn entropy(bits: &BitSequence) -> f64 {
    let balance = BitBalance::of(bits);
    if balance.total() == 0 {
        return 0.0;
    }
    let p1 = balance.p_one();
    let p0 = balance.zeros as f64 / balance.total() as f64;
    let mut h = 0.0;
    for p in [p1, p0] {
        if p > 0.0 {
            h -= p * p.log2();
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: &[u8]) -> BitSequence {
        BitSequence::from_bits(values).unwrap()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(entropy(&BitSequence::new()), 0.0);
    }

    #[test]
    fn test_constant_is_zero() {
        assert_eq!(entropy(&seq(&[0, 0, 0, 0])), 0.0);
        assert_eq!(entropy(&seq(&[1, 1, 1, 1])), 0.0);
    }

    #[test]
    fn test_balanced_is_one() {
        assert_eq!(entropy(&seq(&[0, 1, 0, 1])), 1.0);
        assert_eq!(entropy(&seq(&[1, 1, 0, 0, 1, 0])), 1.0);
    }

    #[test]
    fn test_quarter_bias() {
        // p1 = 0.25: H = 0.811278...
        let h = entropy(&seq(&[1, 0, 0, 0]));
        assert!((h - 0.811_278_124_459_132_9).abs() < 1e-12, "h = {h}");
    }

    #[test]
    fn test_range() {
        for n in 1..40usize {
            let bits: BitSequence = (0..n).map(|i| i % 3 == 0).collect();
            let h = entropy(&bits);
            assert!((0.0..=1.0).contains(&h), "n = {n}, h = {h}");
        }
    }

    #[test]
    fn test_balance_counts() {
        let balance = BitBalance::of(&seq(&[1, 0, 1, 1]));
        assert_eq!(balance.ones, 3);
        assert_eq!(balance.zeros, 1);
        assert_eq!(balance.p_one(), 0.75);
        assert_eq!(BitBalance::of(&BitSequence::new()).p_one(), 0.0);
    }
}
