//! Error correction for bits received over the channel
//!
//! Two schemes are available:
//!
//! - **Oracle** (default): the receiver is handed the transmitted bits and
//!   simply copies them over any mismatch. No real receiver has that
//!   information, so this is an idealized upper bound, not a code.
//! - **Repetition**: each bit is sent an odd number of times and the
//!   receiver takes a majority vote. Uses only what was received.

use crate::{ChannelError, Result};
use marslink_core::bits::BitSequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Generic FEC encoder trait
pub trait FecEncoder {
    /// Add redundancy to the source bits
    fn encode(&self, bits: &BitSequence) -> BitSequence;

    /// Get the code rate (source bits / channel bits)
    fn code_rate(&self) -> f64;

    /// Get overhead bits for given input length
    fn overhead_bits(&self, input_len: usize) -> usize;
}

/// Generic FEC decoder trait
pub trait FecDecoder {
    /// Decode received bits and correct errors
    fn decode(&mut self, received: &BitSequence) -> BitSequence;

    /// Get error statistics from last decode
    fn error_stats(&self) -> ErrorStats;
}

/// Error correction statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorStats {
    /// Channel bits repaired by the corrector
    pub corrected_errors: usize,
    /// Errors noticed, whether or not they were repaired
    pub detected_errors: usize,
    /// Source bits still wrong after correction, measured against what was sent
    pub uncorrectable_errors: usize,
}

/// Oracle correction.
///
/// With `enabled` false the delivered bits are returned unchanged with an
/// error count of 0. Otherwise every position where `delivered` differs from
/// `original` (up to the shorter length) is counted and overwritten with the
/// original value.
pub fn correct(delivered: &BitSequence, original: &BitSequence, enabled: bool) -> (BitSequence, usize) {
    let mut corrected = delivered.clone();
    if !enabled {
        return (corrected, 0);
    }

    let mut error_count = 0;
    for (index, (got, sent)) in delivered.iter().zip(original.iter()).enumerate() {
        if got != sent {
            corrected.set(index, sent == 1);
            error_count += 1;
        }
    }

    (corrected, error_count)
}

/// Repetition code with majority-vote decoding
#[derive(Debug, Clone)]
pub struct RepetitionCode {
    copies: usize,
    stats: ErrorStats,
}

impl RepetitionCode {
    /// Create a repetition code; `copies` must be odd and at least 3
    pub fn new(copies: usize) -> Result<Self> {
        if copies < 3 || copies % 2 == 0 {
            return Err(ChannelError::InvalidCorrectionParameters {
                msg: format!("Repetition copies must be odd and >= 3, got {}", copies),
            });
        }

        Ok(Self {
            copies,
            stats: ErrorStats::default(),
        })
    }

    /// Triple repetition
    pub fn triple() -> Self {
        Self {
            copies: 3,
            stats: ErrorStats::default(),
        }
    }

    /// Get the number of copies per source bit
    pub fn copies(&self) -> usize {
        self.copies
    }
}

impl FecEncoder for RepetitionCode {
    fn encode(&self, bits: &BitSequence) -> BitSequence {
        bits.iter()
            .flat_map(|bit| std::iter::repeat(bit == 1).take(self.copies))
            .collect()
    }

    fn code_rate(&self) -> f64 {
        1.0 / self.copies as f64
    }

    fn overhead_bits(&self, input_len: usize) -> usize {
        input_len * (self.copies - 1)
    }
}

impl FecDecoder for RepetitionCode {
    fn decode(&mut self, received: &BitSequence) -> BitSequence {
        let mut stats = ErrorStats::default();
        let mut decoded = BitSequence::with_capacity(received.len() / self.copies);

        let groups = received.data().chunks_exact(self.copies);
        let leftover = groups.remainder().len();
        for group in groups {
            let ones = group.iter().filter(|&&b| b == 1).count();
            let majority_one = ones * 2 > self.copies;
            let dissenting = if majority_one { self.copies - ones } else { ones };

            if dissenting > 0 {
                stats.detected_errors += 1;
                stats.corrected_errors += dissenting;
            }
            decoded.push(majority_one);
        }

        if leftover > 0 {
            debug!("Dropping {} received bits that do not form a full repetition group", leftover);
        }

        self.stats = stats;
        decoded
    }

    fn error_stats(&self) -> ErrorStats {
        self.stats
    }
}

/// Correction scheme selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrectionScheme {
    Oracle,
    Repetition { copies: usize },
}

impl Default for CorrectionScheme {
    fn default() -> Self {
        CorrectionScheme::Oracle
    }
}

impl fmt::Display for CorrectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionScheme::Oracle => write!(f, "oracle"),
            CorrectionScheme::Repetition { copies } => write!(f, "repetition x{}", copies),
        }
    }
}

/// Result of correcting one transmission
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    /// Recovered source bits
    pub corrected: BitSequence,
    pub stats: ErrorStats,
}

/// Applies a [`CorrectionScheme`] on both ends of the channel
#[derive(Debug, Clone)]
pub struct Corrector {
    scheme: CorrectionScheme,
    enabled: bool,
    repetition: Option<RepetitionCode>,
}

impl Corrector {
    /// Create a corrector, validating scheme parameters
    pub fn new(scheme: CorrectionScheme, enabled: bool) -> Result<Self> {
        let repetition = match scheme {
            CorrectionScheme::Oracle => None,
            CorrectionScheme::Repetition { copies } => Some(RepetitionCode::new(copies)?),
        };

        Ok(Self {
            scheme,
            enabled,
            repetition,
        })
    }

    pub fn scheme(&self) -> CorrectionScheme {
        self.scheme
    }

    /// Channel bits sent for each source bit
    pub fn channel_bits_per_source(&self) -> usize {
        match (&self.repetition, self.enabled) {
            (Some(code), true) => code.copies(),
            _ => 1,
        }
    }

    /// Bits to put on the channel for the given source bits
    pub fn prepare(&self, source: &BitSequence) -> BitSequence {
        match (&self.repetition, self.enabled) {
            (Some(code), true) => code.encode(source),
            _ => source.clone(),
        }
    }

    /// Recover source bits from what the channel delivered
    pub fn recover(&mut self, delivered: &BitSequence, source: &BitSequence) -> Correction {
        let enabled = self.enabled;
        match (&mut self.repetition, enabled) {
            (Some(code), true) => {
                let corrected = code.decode(delivered);
                let mut stats = code.error_stats();
                stats.uncorrectable_errors = corrected.hamming_distance(source)
                    + source.len().saturating_sub(corrected.len());
                Correction { corrected, stats }
            }
            _ => {
                let detected = delivered.hamming_distance(source);
                let (corrected, error_count) = correct(delivered, source, enabled);
                Correction {
                    corrected,
                    stats: ErrorStats {
                        corrected_errors: error_count,
                        detected_errors: detected,
                        uncorrectable_errors: detected - error_count,
                    },
                }
            }
        }
    }
}
