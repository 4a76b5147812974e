//! Bit sequences: the "measured qubit" values every other module consumes.

use crate::error::{Result, SimError};

/// Ordered sequence of measured bits.
///
/// Bits are stored as `bool`, so a value outside {0, 1} cannot be
/// represented. Use [`BitSequence::from_bits`] to build one from raw
/// integers with validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    /// Empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from integer bit values, rejecting anything other than 0 or 1.
    pub fn from_bits(values: &[u8]) -> Result<Self> {
        let mut bits = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            match value {
                0 => bits.push(false),
                1 => bits.push(true),
                _ => return Err(SimError::InvalidBit { index, value }),
            }
        }
        Ok(Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Number of 1-bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Bits as integer values (0 or 1).
    pub fn to_bits(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b)).collect()
    }

    /// Render as a `'0'`/`'1'` string in sequence order (index 0 first).
    pub fn to_bitstring(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// Validate a signed bit-count request.
pub fn checked_count(count: i64) -> Result<usize> {
    usize::try_from(count).map_err(|_| SimError::InvalidCount(count))
}
