//! Bit sequence storage and operations
//!
//! Bits are stored one per `u8` (values 0 and 1), most significant bit of
//! each source byte first.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Number of bits carried by one source character
pub const BITS_PER_CHAR: usize = 8;

/// Ordered sequence of binary values
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitSequence {
    bits: Vec<u8>,
}

impl BitSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Create an empty sequence able to hold `capacity` bits without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Create a sequence from raw 0/1 values
    pub fn from_bits(bits: Vec<u8>) -> Result<Self> {
        if let Some(position) = bits.iter().position(|&b| b > 1) {
            return Err(CoreError::InvalidBit {
                value: bits[position],
                position,
            });
        }

        Ok(Self { bits })
    }

    /// Unpack bytes MSB-first, 8 bits per byte
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(bytes.len() * BITS_PER_CHAR);
        for &byte in bytes {
            for i in (0..BITS_PER_CHAR).rev() {
                bits.push((byte >> i) & 1);
            }
        }
        Self { bits }
    }

    /// Get the number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Get a reference to the underlying 0/1 values
    pub fn data(&self) -> &[u8] {
        &self.bits
    }

    /// Get the bit at `index`
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bits.get(index).copied()
    }

    /// Append a bit
    pub fn push(&mut self, one: bool) {
        self.bits.push(one as u8);
    }

    /// Iterate over the bits in order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bits.iter().copied()
    }

    /// Overwrite the bit at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, one: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = one as u8;
        }
    }

    /// Pack complete 8-bit groups into bytes, MSB first.
    ///
    /// A trailing group shorter than 8 bits is dropped.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks_exact(BITS_PER_CHAR)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
            .collect()
    }

    /// Number of bits dropped by [`BitSequence::to_bytes`]
    pub fn trailing_bits(&self) -> usize {
        self.bits.len() % BITS_PER_CHAR
    }

    /// Sequence with every bit inverted
    pub fn complement(&self) -> Self {
        Self {
            bits: self.bits.iter().map(|&b| b ^ 1).collect(),
        }
    }

    /// Count positions that differ, up to the shorter of the two lengths
    pub fn hamming_distance(&self, other: &BitSequence) -> usize {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl Index<usize> for BitSequence {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bits[index]
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().map(|one| one as u8).collect(),
        }
    }
}

impl fmt::Display for BitSequence {
    /// Bits grouped by byte, e.g. `01001000 01101001`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.bits.chunks(BITS_PER_CHAR).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            for bit in chunk {
                write!(f, "{}", bit)?;
            }
        }
        Ok(())
    }
}
