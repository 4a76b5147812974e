//! Simplified two-basis key derivation ("BB84-simplified").
//!
//! The protocol draws a raw bit stream, picks a basis label per position,
//! and extracts key bits from the nibbles of the raw stream's hex encoding.
//! The basis labels are recorded and counted but do not take part in
//! extraction, and no sifting against a second party happens. Callers get
//! the basis statistic for reporting only.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::bits::BitSequence;
use crate::entropy::entropy;
use crate::error::{Result, SimError};
use crate::packing::pack;
use crate::source::BitSource;

/// Protocol tag reported with every derived key.
pub const PROTOCOL: &str = "BB84-simplified";

/// Measurement basis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    Rectilinear,
    Diagonal,
}

impl Basis {
    /// Map one uniform bit to a basis.
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::Diagonal } else { Self::Rectilinear }
    }
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rectilinear => write!(f, "rectilinear"),
            Self::Diagonal => write!(f, "diagonal"),
        }
    }
}

/// Derived key and its derivation statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMaterial {
    /// Lowercase hex of the packed key bits, `2 * ceil(key_size_bits / 8)` chars.
    pub key_hex: String,
    pub key_size_bits: usize,
    pub protocol: &'static str,
    /// Distinct basis labels used: 1 or 2.
    pub bases_used: usize,
    /// Label of the source that produced the raw stream.
    pub source: &'static str,
    /// Normalized Shannon entropy of the raw stream.
    pub raw_entropy: f64,
}

/// Extract key bit `index` from a hex string: bit `index % 4` of the nibble
/// at hex position `index / 4`.
fn nibble_bit(hex: &[u8], index: usize) -> bool {
    let nibble = match hex[index / 4] {
        c @ b'0'..=b'9' => c - b'0',
        c @ b'a'..=b'f' => c - b'a' + 10,
        c => unreachable!("packer emits lowercase hex only, got {c:#x}"),
    };
    (nibble >> (index % 4)) & 1 == 1
}

/// Derive a `key_size_bits`-bit key from `source`.
pub fn derive_key(source: &dyn BitSource, key_size_bits: usize) -> Result<KeyMaterial> {
    if key_size_bits == 0 {
        return Err(SimError::InvalidQubitCount(0));
    }

    let raw = source.generate(key_size_bits);
    let raw_encoding = pack(&raw);

    let bases: Vec<Basis> = source
        .generate(key_size_bits)
        .iter()
        .map(Basis::from_bit)
        .collect();

    let hex = raw_encoding.hex.as_bytes();
    let key_bits: BitSequence = (0..key_size_bits).map(|i| nibble_bit(hex, i)).collect();
    let key = pack(&key_bits);

    let bases_used = bases.iter().collect::<BTreeSet<_>>().len();

    Ok(KeyMaterial {
        key_hex: key.hex,
        key_size_bits,
        protocol: PROTOCOL,
        bases_used,
        source: source.name(),
        raw_entropy: entropy(&raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tests::{PatternSource, StreamSource};
    use crate::source::{SeededBitSource, ThreadRngSource};

    #[test]
    fn test_256_bit_key_shape() {
        let key = derive_key(&ThreadRngSource, 256).unwrap();
        assert_eq!(key.key_hex.len(), 64);
        assert!((1..=2).contains(&key.bases_used));
        assert_eq!(key.protocol, PROTOCOL);
        assert_eq!(key.key_size_bits, 256);
        assert!(key.key_hex.bytes().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_partial_byte_key_width() {
        let key = derive_key(&ThreadRngSource, 12).unwrap();
        assert_eq!(key.key_hex.len(), 4);
    }

    #[test]
    fn test_zero_key_size_rejected() {
        assert_eq!(
            derive_key(&ThreadRngSource, 0).unwrap_err(),
            SimError::InvalidQubitCount(0)
        );
    }

    #[test]
    fn test_constant_source_uses_one_basis() {
        // All-ones stream: every basis bit is 1, so only "diagonal" is used.
        let key = derive_key(&PatternSource::new(&[1]), 64).unwrap();
        assert_eq!(key.bases_used, 1);
        assert_eq!(key.raw_entropy, 0.0);
    }

    #[test]
    fn test_alternating_source_uses_both_bases() {
        let key = derive_key(&PatternSource::new(&[0, 1]), 64).unwrap();
        assert_eq!(key.bases_used, 2);
        assert_eq!(key.raw_entropy, 1.0);
    }

    #[test]
    fn test_extraction_from_known_stream() {
        // Raw bits 1,0,0,0,1,0,0,0 pack to 0x11, hex "11". Key bit i is bit
        // (i % 4) of hex digit i / 4, and both digits are 0x1.
        let key = derive_key(&PatternSource::new(&[1, 0, 0, 0]), 8).unwrap();
        assert_eq!(key.key_hex, "11");
    }

    #[test]
    fn test_basis_bits_do_not_change_key() {
        // First 12 bits are the raw stream, next 12 pick the bases.
        let raw = [1, 0, 1, 1, 0, 0, 1, 0, 0, 1, 1, 1];
        let stream = |bases: [u8; 12]| {
            let mut s = raw.to_vec();
            s.extend_from_slice(&bases);
            StreamSource::new(&s)
        };

        let rectilinear = derive_key(&stream([0; 12]), 12).unwrap();
        let diagonal = derive_key(&stream([1; 12]), 12).unwrap();
        let mixed = derive_key(&stream([0, 1, 1, 0, 1, 0, 0, 0, 1, 1, 0, 1]), 12).unwrap();

        assert_eq!(rectilinear.bases_used, 1);
        assert_eq!(diagonal.bases_used, 1);
        assert_eq!(mixed.bases_used, 2);
        assert_eq!(rectilinear.key_hex, diagonal.key_hex);
        assert_eq!(rectilinear.key_hex, mixed.key_hex);
        assert_eq!(rectilinear.raw_entropy, mixed.raw_entropy);
    }

    #[test]
    fn test_seeded_keys_reproduce() {
        let a = derive_key(&SeededBitSource::new(99), 128).unwrap();
        let b = derive_key(&SeededBitSource::new(99), 128).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.source, "seeded");
    }

    #[test]
    fn test_nibble_bit() {
        // 'a' = 0b1010
        let hex = b"a";
        assert!(!nibble_bit(hex, 0));
        assert!(nibble_bit(hex, 1));
        assert!(!nibble_bit(hex, 2));
        assert!(nibble_bit(hex, 3));
    }

    #[test]
    fn test_basis_display() {
        assert_eq!(Basis::from_bit(false).to_string(), "rectilinear");
        assert_eq!(Basis::from_bit(true).to_string(), "diagonal");
    }
}
