//! Expected digest values and how computed digests are compared to them.

use std::fmt;

use crate::Encoding;

/// A digest the caller is looking for.
///
/// Raw bytes are compared exactly. Text is compared against the computed
/// digest rendered in the same encoding: case-insensitively for encodings
/// such as hex, exactly for encodings where case is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// Raw digest bytes.
    Bytes(Vec<u8>),
    /// A formatted digest and the encoding it is written in.
    Text {
        /// The formatted value.
        value: String,
        /// The encoding `value` is written in.
        encoding: Encoding,
    },
}

impl Expected {
    /// Expect a formatted value.
    pub fn text(value: impl Into<String>, encoding: Encoding) -> Self {
        Expected::Text {
            value: value.into().trim().to_string(),
            encoding,
        }
    }

    /// Expect raw bytes.
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Expected::Bytes(value.into())
    }

    /// Check a computed digest against this expectation.
    ///
    /// # Example
    ///
    /// ```
    /// use hashsleuth_common::{Encoding, Expected};
    ///
    /// let expected = Expected::text("CBF43926", Encoding::Hex);
    /// assert!(expected.matches(&[0xCB, 0xF4, 0x39, 0x26]));
    /// ```
    pub fn matches(&self, digest: &[u8]) -> bool {
        match self {
            Expected::Bytes(bytes) => bytes.as_slice() == digest,
            Expected::Text { value, encoding } => {
                compare_text(value, &encoding.encode(digest), *encoding)
            }
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Bytes(bytes) => write!(f, "{}", hex::encode(bytes)),
            Expected::Text { value, encoding } => write!(f, "{value} ({encoding})"),
        }
    }
}

/// Compare a user-supplied value with a computed one in the given encoding.
pub fn compare_text(expected: &str, computed: &str, encoding: Encoding) -> bool {
    if encoding.is_case_sensitive() {
        expected == computed
    } else {
        expected.eq_ignore_ascii_case(computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_case_insensitive() {
        assert!(compare_text("DEADBEEF", "deadbeef", Encoding::Hex));
        assert!(Expected::text("DEADBEEF", Encoding::Hex).matches(&[0xDE, 0xAD, 0xBE, 0xEF]));
        assert!(Expected::text("deadbeef", Encoding::HexUpper).matches(&[0xDE, 0xAD, 0xBE, 0xEF]));
    }

    #[test]
    fn test_base64_is_case_sensitive() {
        assert!(!compare_text("AbCd", "abcd", Encoding::Base64));
        assert!(compare_text("AbCd", "AbCd", Encoding::Base64));
        assert!(!compare_text("helloworld", "HelloWorld", Encoding::Z85));
    }

    #[test]
    fn test_bytes_are_exact() {
        let expected = Expected::bytes(vec![0x12, 0x34]);
        assert!(expected.matches(&[0x12, 0x34]));
        assert!(!expected.matches(&[0x00, 0x12, 0x34]));
    }

    #[test]
    fn test_text_is_trimmed() {
        assert!(Expected::text(" 31c3 \n", Encoding::Hex).matches(&[0x31, 0xC3]));
    }
}
