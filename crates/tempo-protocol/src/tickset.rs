//! Tickset bit container
//!
//! A tickset records which sub-parts of a multi-part hit object (ticks,
//! repeats, tail) were hit. On the wire it is a run of bytes stored in
//! reverse order: bit `j` lives in byte `len - j / 8 - 1`, at bit position
//! `j % 8` within that byte.

use bytes::Bytes;

/// Packed tickset bits, kept in wire byte order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tickset {
    bytes: Bytes,
}

impl Tickset {
    /// Wrap raw wire bytes
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Pack a bit sequence into wire order
    pub fn from_bits(bits: &[bool]) -> Self {
        let len = (bits.len() + 7) / 8;
        let mut bytes = vec![0u8; len];
        for (j, _) in bits.iter().enumerate().filter(|(_, bit)| **bit) {
            bytes[len - j / 8 - 1] |= 1 << (j % 8);
        }
        Self::from_bytes(bytes)
    }

    /// Raw bytes as they appear on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of addressable bits (always a multiple of eight)
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bit `j`, or `None` past the end
    pub fn get(&self, j: usize) -> Option<bool> {
        if j >= self.len() {
            return None;
        }
        let byte = self.bytes[self.bytes.len() - j / 8 - 1];
        Some((byte >> (j % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).filter_map(move |j| self.get(j))
    }

    /// Number of set bits
    pub fn hit_count(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }
}
