//! Textual encodings of digest values.
//!
//! Digests are raw byte strings; users see them through one of these
//! encodings. Whether two encoded values may be compared case-insensitively
//! depends on the encoding, see [`Encoding::is_case_sensitive`].

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use num_bigint::BigUint;

use crate::Error;

/// The Z85 alphabet (ZeroMQ RFC 32).
const Z85_ALPHABET: &[u8; 85] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-:+=^!/*?&<>()[]{}@%$#";

/// Output encoding of a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// Lowercase hexadecimal.
    #[default]
    Hex,
    /// Uppercase hexadecimal.
    HexUpper,
    /// The digest read as a big-endian unsigned integer, in decimal.
    Decimal,
    /// The digest read as a big-endian unsigned integer, in octal.
    Octal,
    /// Every bit of the digest, most significant first.
    Binary,
    /// Base64 with padding (RFC 4648 section 4).
    Base64,
    /// Base64 without padding.
    Base64NoPadding,
    /// URL-safe Base64 without padding (RFC 4648 section 5).
    Base64Url,
    /// ZeroMQ Base85.
    Z85,
}

impl Encoding {
    /// All encodings, in display order.
    pub const ALL: [Encoding; 9] = [
        Encoding::Hex,
        Encoding::HexUpper,
        Encoding::Decimal,
        Encoding::Octal,
        Encoding::Binary,
        Encoding::Base64,
        Encoding::Base64NoPadding,
        Encoding::Base64Url,
        Encoding::Z85,
    ];

    /// Short name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::HexUpper => "hexup",
            Encoding::Decimal => "dec",
            Encoding::Octal => "oct",
            Encoding::Binary => "bin",
            Encoding::Base64 => "base64",
            Encoding::Base64NoPadding => "base64-nopad",
            Encoding::Base64Url => "base64url",
            Encoding::Z85 => "z85",
        }
    }

    /// Whether letter case carries meaning in this encoding.
    ///
    /// The Base64 family and Z85 use both cases as distinct digits, so
    /// values in those encodings must be compared exactly.
    pub const fn is_case_sensitive(self) -> bool {
        matches!(
            self,
            Encoding::Base64 | Encoding::Base64NoPadding | Encoding::Base64Url | Encoding::Z85
        )
    }

    /// Encode a digest.
    pub fn encode(self, digest: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(digest),
            Encoding::HexUpper => hex::encode_upper(digest),
            Encoding::Decimal => BigUint::from_bytes_be(digest).to_str_radix(10),
            Encoding::Octal => BigUint::from_bytes_be(digest).to_str_radix(8),
            Encoding::Binary => digest.iter().map(|b| format!("{b:08b}")).collect(),
            Encoding::Base64 => STANDARD.encode(digest),
            Encoding::Base64NoPadding => STANDARD_NO_PAD.encode(digest),
            Encoding::Base64Url => URL_SAFE_NO_PAD.encode(digest),
            Encoding::Z85 => z85_encode(digest),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let found = match lower.as_str() {
            "hex" | "hexlc" => Encoding::Hex,
            "hexup" | "hexuc" => Encoding::HexUpper,
            "dec" | "decimal" => Encoding::Decimal,
            "oct" | "octal" => Encoding::Octal,
            "bin" | "binary" => Encoding::Binary,
            "base64" | "b64" => Encoding::Base64,
            "base64-nopad" | "base64-nopadding" => Encoding::Base64NoPadding,
            "base64url" | "base64-url" => Encoding::Base64Url,
            "z85" => Encoding::Z85,
            _ => return Err(Error::InvalidEncoding(s.to_string())),
        };
        Ok(found)
    }
}

/// Z85 works on 4-byte frames; shorter tails are left-padded with zero
/// bytes so that the encoded value still reads as the same number.
fn z85_encode(digest: &[u8]) -> String {
    let pad = (4 - digest.len() % 4) % 4;
    let mut padded = vec![0u8; pad];
    padded.extend_from_slice(digest);

    let mut out = String::with_capacity(padded.len() / 4 * 5);
    for frame in padded.chunks_exact(4) {
        let mut value = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        let mut chars = [0u8; 5];
        for c in chars.iter_mut().rev() {
            *c = Z85_ALPHABET[(value % 85) as usize];
            value /= 85;
        }
        out.extend(chars.iter().map(|&c| c as char));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_decimal() {
        let digest = [0xCB, 0xF4, 0x39, 0x26];
        assert_eq!(Encoding::Hex.encode(&digest), "cbf43926");
        assert_eq!(Encoding::HexUpper.encode(&digest), "CBF43926");
        assert_eq!(Encoding::Decimal.encode(&digest), "3421780262");
        assert_eq!(Encoding::Octal.encode(&[0x01, 0x00]), "400");
        assert_eq!(Encoding::Binary.encode(&[0xA5]), "10100101");
    }

    #[test]
    fn test_z85_reference_vector() {
        // From the Z85 specification.
        let data = [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B];
        assert_eq!(Encoding::Z85.encode(&data), "HelloWorld");
    }

    #[test]
    fn test_z85_pads_short_input() {
        assert_eq!(Encoding::Z85.encode(&[0x00, 0x01]), Encoding::Z85.encode(&[0, 0, 0, 1]));
    }

    #[test]
    fn test_base64_variants() {
        let digest = [0xFB, 0xFF];
        assert_eq!(Encoding::Base64.encode(&digest), "+/8=");
        assert_eq!(Encoding::Base64NoPadding.encode(&digest), "+/8");
        assert_eq!(Encoding::Base64Url.encode(&digest), "-_8");
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(!Encoding::Hex.is_case_sensitive());
        assert!(!Encoding::Decimal.is_case_sensitive());
        assert!(Encoding::Base64.is_case_sensitive());
        assert!(Encoding::Z85.is_case_sensitive());
    }

    #[test]
    fn test_parse_names() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.name().parse::<Encoding>().unwrap(), encoding);
        }
        assert!("rot13".parse::<Encoding>().is_err());
    }
}
