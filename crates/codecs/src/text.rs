//! Text codec implementations

use crate::{CodecError, Result};
use marslink_core::bits::BitSequence;
use tracing::debug;

/// Generic text codec trait
pub trait TextCodec {
    /// Encode text to a bit sequence
    fn encode(&self, text: &str) -> Result<BitSequence>;

    /// Decode a bit sequence to text.
    ///
    /// Decoding is total: data the codec cannot use is dropped, never reported.
    fn decode(&self, bits: &BitSequence) -> String;
}

/// Fixed-width 8-bit codec over code points U+0000..=U+00FF.
///
/// Each character becomes its code point as 8 bits, MSB first. Characters
/// above U+00FF are rejected rather than truncated or expanded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1Codec;

impl Latin1Codec {
    pub fn new() -> Self {
        Self
    }
}

impl TextCodec for Latin1Codec {
    fn encode(&self, text: &str) -> Result<BitSequence> {
        let mut bytes = Vec::with_capacity(text.len());

        for (position, character) in text.chars().enumerate() {
            let code = character as u32;
            let byte = u8::try_from(code).map_err(|_| CodecError::UnrepresentableCharacter {
                character,
                code,
                position,
            })?;
            bytes.push(byte);
        }

        Ok(BitSequence::from_bytes(&bytes))
    }

    fn decode(&self, bits: &BitSequence) -> String {
        let dropped = bits.trailing_bits();
        if dropped > 0 {
            debug!("Dropping {} trailing bits that do not form a full character", dropped);
        }

        bits.to_bytes().into_iter().map(char::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_encode_hi() {
        let bits = Latin1Codec.encode("Hi").unwrap();
        assert_eq!(bits.len(), 16);
        assert_eq!(bits.to_string(), "01001000 01101001");
    }

    #[test]
    fn test_empty_text() {
        let bits = Latin1Codec.encode("").unwrap();
        assert!(bits.is_empty());
        assert_eq!(Latin1Codec.decode(&bits), "");
    }

    #[test]
    fn test_latin1_range() {
        let text = "café ÿ\u{0}";
        let bits = Latin1Codec.encode(text).unwrap();
        assert_eq!(bits.len(), 8 * text.chars().count());
        assert_eq!(Latin1Codec.decode(&bits), text);
    }

    #[test]
    fn test_wide_character_rejected() {
        let err = Latin1Codec.encode("Mars Ā").unwrap_err();
        assert_eq!(
            err,
            CodecError::UnrepresentableCharacter {
                character: 'Ā',
                code: 0x100,
                position: 5,
            }
        );
    }

    #[test]
    fn test_decode_drops_trailing_bits() {
        let full = Latin1Codec.encode("Hi").unwrap();
        for (len, expected) in [(0, ""), (7, ""), (8, "H"), (9, "H"), (15, "H"), (16, "Hi")] {
            let bits = BitSequence::from_bits(full.data()[..len].to_vec()).unwrap();
            assert_eq!(Latin1Codec.decode(&bits), expected, "length {}", len);
        }
    }

    #[quickcheck]
    fn prop_ascii_roundtrip(text: String) -> bool {
        let text: String = text.chars().filter(char::is_ascii).collect();
        let bits = Latin1Codec.encode(&text).unwrap();
        bits.len() == 8 * text.len() && Latin1Codec.decode(&bits) == text
    }
}
