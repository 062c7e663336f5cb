//! Binary symmetric channel
//!
//! Every bit is flipped independently with a fixed probability. Bits are
//! never lost, duplicated or reordered. Delivery is pull-based: the
//! [`Transmit`] iterator yields one bit per call to `next`, so the caller
//! decides the pacing.
//!
//! # Determinism
//!
//! The random source is supplied by the caller. Given the same seeded RNG
//! and inputs, the delivered bits are identical.

use crate::Result;
use marslink_core::bits::BitSequence;
use marslink_core::params::check_probability;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// One bit as sent and as received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitPair {
    /// Position in the transmitted sequence
    pub index: usize,
    pub original: u8,
    pub delivered: u8,
}

impl BitPair {
    /// Check whether the channel inverted this bit
    pub fn is_flipped(&self) -> bool {
        self.original != self.delivered
    }
}

/// Memoryless channel flipping each bit with probability `error_probability`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinarySymmetricChannel {
    error_probability: f64,
}

impl BinarySymmetricChannel {
    /// Create a channel, rejecting probabilities outside [0, 1]
    pub fn new(error_probability: f64) -> Result<Self> {
        check_probability("error_probability", error_probability)?;
        Ok(Self { error_probability })
    }

    /// Noiseless channel
    pub fn perfect() -> Self {
        Self {
            error_probability: 0.0,
        }
    }

    /// Get the per-bit flip probability
    pub fn error_probability(&self) -> f64 {
        self.error_probability
    }

    /// Start a transmission of `bits`.
    ///
    /// The returned iterator owns its copy of the bits and the RNG; a new
    /// call is the only way to restart.
    pub fn transmit<R: Rng>(&self, bits: BitSequence, rng: R) -> Transmit<R> {
        Transmit {
            bits,
            index: 0,
            error_probability: self.error_probability,
            rng,
        }
    }

    /// Send every bit at once and return what arrived
    pub fn corrupt<R: Rng>(&self, bits: &BitSequence, rng: &mut R) -> BitSequence {
        self.transmit(bits.clone(), rng)
            .map(|pair| pair.delivered == 1)
            .collect()
    }
}

/// Lazy, in-order delivery of a bit sequence over a [`BinarySymmetricChannel`]
#[derive(Debug, Clone)]
pub struct Transmit<R> {
    bits: BitSequence,
    index: usize,
    error_probability: f64,
    rng: R,
}

impl<R> Transmit<R> {
    /// Number of bits already delivered
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of bits still to deliver
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.index
    }

    /// The sequence being transmitted
    pub fn original(&self) -> &BitSequence {
        &self.bits
    }
}

impl<R: Rng> Iterator for Transmit<R> {
    type Item = BitPair;

    fn next(&mut self) -> Option<Self::Item> {
        let original = self.bits.get(self.index)?;

        // gen::<f64>() is uniform in [0, 1), so p = 1.0 always flips
        let r: f64 = self.rng.gen();
        let delivered = if r < self.error_probability {
            original ^ 1
        } else {
            original
        };

        let pair = BitPair {
            index: self.index,
            original,
            delivered,
        };
        self.index += 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for Transmit<R> {}

impl<R: Rng> FusedIterator for Transmit<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_invalid_probability() {
        assert!(BinarySymmetricChannel::new(1.0001).is_err());
        assert!(BinarySymmetricChannel::new(-0.5).is_err());
        assert!(BinarySymmetricChannel::new(f64::NAN).is_err());
    }

    #[test]
    fn test_perfect_channel() {
        let bits = BitSequence::from_bytes(b"Hello Mars");
        let channel = BinarySymmetricChannel::perfect();
        assert_eq!(channel.error_probability(), 0.0);
        let delivered = channel.corrupt(&bits, &mut rng(1));
        assert_eq!(delivered, bits);
    }

    #[test]
    fn test_always_flipping_channel() {
        let bits = BitSequence::from_bytes(b"Hi");
        let channel = BinarySymmetricChannel::new(1.0).unwrap();
        for pair in channel.transmit(bits.clone(), rng(2)) {
            assert!(pair.is_flipped());
        }
        assert_eq!(channel.corrupt(&bits, &mut rng(3)), bits.complement());
    }

    #[test]
    fn test_in_order_and_finite() {
        let bits = BitSequence::from_bytes(&[0xA5, 0x3C]);
        let channel = BinarySymmetricChannel::new(0.3).unwrap();
        let mut transmit = channel.transmit(bits.clone(), rng(4));
        assert_eq!(transmit.len(), 16);
        assert_eq!(transmit.position(), 0);

        for expected in 0..16 {
            let pair = transmit.next().unwrap();
            assert_eq!(pair.index, expected);
            assert_eq!(transmit.position(), expected + 1);
            assert_eq!(pair.original, bits[expected]);
            assert_eq!(transmit.remaining(), 15 - expected);
        }
        assert!(transmit.next().is_none());
        assert!(transmit.next().is_none());
    }

    #[test]
    fn test_empty_input() {
        let channel = BinarySymmetricChannel::new(0.5).unwrap();
        assert_eq!(channel.transmit(BitSequence::new(), rng(5)).count(), 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let bits = BitSequence::from_bytes(b"deterministic");
        let channel = BinarySymmetricChannel::new(0.25).unwrap();
        let a = channel.corrupt(&bits, &mut rng(42));
        let b = channel.corrupt(&bits, &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_flip_rate_close_to_probability() {
        let bits = BitSequence::from_bits(vec![0; 20_000]).unwrap();
        let channel = BinarySymmetricChannel::new(0.1).unwrap();
        let flips = channel
            .transmit(bits, rng(7))
            .filter(BitPair::is_flipped)
            .count();
        let rate = flips as f64 / 20_000.0;
        assert!((rate - 0.1).abs() < 0.01, "observed rate {}", rate);
    }

    #[quickcheck]
    fn prop_extreme_probabilities(bytes: Vec<u8>, seed: u64) -> bool {
        let bits = BitSequence::from_bytes(&bytes);
        let clean = BinarySymmetricChannel::perfect().corrupt(&bits, &mut rng(seed));
        let inverted = BinarySymmetricChannel::new(1.0)
            .unwrap()
            .corrupt(&bits, &mut rng(seed));
        clean == bits && inverted == bits.complement()
    }
}
