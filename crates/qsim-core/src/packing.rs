//! Bit packing: bits → bytes → lowercase hex.
//!
//! Bit `i` of a sequence lands at bit position `i % 8` (least significant
//! first) of byte `i / 8`. A trailing partial byte keeps its unused high bits
//! at zero. Packing is a pure function of the input.

use serde::Serialize;

use crate::bits::BitSequence;

/// Packed form of a bit sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByteEncoding {
    /// Number of bits that were packed.
    pub bit_count: usize,
    /// `ceil(bit_count / 8)` bytes, LSB-first within each byte.
    pub bytes: Vec<u8>,
    /// Two lowercase hex digits per byte, byte 0 first.
    pub hex: String,
}

impl ByteEncoding {
    /// Read back bit `index` from the packed bytes.
    ///
    /// `None` past `bit_count`, or past the end of `bytes` when the two
    /// disagree on a hand-built value.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        let byte = self.bytes.get(index / 8)?;
        Some((byte >> (index % 8)) & 1 == 1)
    }

    /// Number of packed bytes.
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }
}

/// Pack a bit sequence into bytes and hex.
pub fn pack(bits: &BitSequence) -> ByteEncoding {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    let hex = hex_encode(&bytes);
    ByteEncoding {
        bit_count: bits.len(),
        bytes,
        hex,
    }
}

/// Hex-encode bytes without any separator.
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}
