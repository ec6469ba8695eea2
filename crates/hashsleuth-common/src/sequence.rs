//! Literal byte sequences.
//!
//! A sequence is given on the command line as `<format>:<value>`:
//!
//! | prefix    | value                                     |
//! |-----------|-------------------------------------------|
//! | `txt:`    | UTF-8 text                                |
//! | `hex:`    | hex digits, whitespace ignored            |
//! | `dec:`    | comma separated bytes in decimal          |
//! | `oct:`    | comma separated bytes in octal            |
//! | `bin:`    | bits, whitespace ignored, multiple of 8   |
//! | `base64:` | standard Base64                           |
//!
//! Text without a recognised prefix is taken verbatim.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::{Error, Result};

/// An owned byte sequence to be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence(Vec<u8>);

impl Sequence {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a `<format>:<value>` sequence specification.
    ///
    /// # Example
    ///
    /// ```
    /// use hashsleuth_common::Sequence;
    ///
    /// let seq = Sequence::parse("hex:31 32 33")?;
    /// assert_eq!(seq.as_bytes(), b"123");
    /// # Ok::<(), hashsleuth_common::Error>(())
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let Some((prefix, value)) = spec.split_once(':') else {
            return Ok(Self::new(spec.as_bytes()));
        };

        let bytes = match prefix.to_ascii_lowercase().as_str() {
            "txt" | "text" => value.as_bytes().to_vec(),
            "hex" => hex::decode(strip_whitespace(value))?,
            "dec" => parse_radix_list(spec, value, 10)?,
            "oct" => parse_radix_list(spec, value, 8)?,
            "bin" => parse_bits(spec, value)?,
            "base64" | "b64" => STANDARD.decode(value.trim())?,
            _ => spec.as_bytes().to_vec(),
        };

        Ok(Self(bytes))
    }

    /// Borrow the bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for Sequence {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Sequence {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl FromStr for Sequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hex:{}", hex::encode(&self.0))
    }
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn invalid(input: &str, reason: impl Into<String>) -> Error {
    Error::InvalidSequence {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn parse_radix_list(input: &str, value: &str, radix: u32) -> Result<Vec<u8>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }

    value
        .split(',')
        .map(|item| {
            let item = item.trim();
            u8::from_str_radix(item, radix)
                .map_err(|e| invalid(input, format!("byte {item:?}: {e}")))
        })
        .collect()
}

fn parse_bits(input: &str, value: &str) -> Result<Vec<u8>> {
    let bits = strip_whitespace(value);
    if bits.len() % 8 != 0 {
        return Err(invalid(input, format!("{} bits is not a whole number of bytes", bits.len())));
    }

    bits.as_bytes()
        .chunks(8)
        .map(|chunk| {
            chunk.iter().try_fold(0u8, |acc, &bit| match bit {
                b'0' => Ok(acc << 1),
                b'1' => Ok((acc << 1) | 1),
                other => Err(invalid(input, format!("unexpected character {:?}", other as char))),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_forms() {
        assert_eq!(Sequence::parse("txt:123456789").unwrap().as_bytes(), b"123456789");
        assert_eq!(Sequence::parse("plain").unwrap().as_bytes(), b"plain");
        // Unknown prefixes keep the whole input, colon included.
        assert_eq!(Sequence::parse("a:b").unwrap().as_bytes(), b"a:b");
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(Sequence::parse("hex:DEAD beef").unwrap().as_bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(Sequence::parse("dec:0, 1,255").unwrap().as_bytes(), &[0, 1, 255]);
        assert_eq!(Sequence::parse("oct:377,10").unwrap().as_bytes(), &[255, 8]);
        assert_eq!(Sequence::parse("bin:10100101 00000001").unwrap().as_bytes(), &[0xA5, 0x01]);
        assert_eq!(Sequence::parse("base64:MTIz").unwrap().as_bytes(), b"123");
        assert!(Sequence::parse("dec:").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_forms() {
        assert!(Sequence::parse("dec:256").is_err());
        assert!(Sequence::parse("hex:abc").is_err());
        assert!(Sequence::parse("bin:1010").is_err());
        assert!(Sequence::parse("bin:1010201x").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let seq = Sequence::new(vec![0x00, 0xFF]);
        assert_eq!(seq.to_string(), "hex:00ff");
        assert_eq!(Sequence::parse(&seq.to_string()).unwrap(), seq);
    }
}
