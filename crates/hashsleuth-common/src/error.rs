//! Error types for hashsleuth-common.

use thiserror::Error;

/// Common error type for hashsleuth operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A byte sequence specification could not be parsed.
    #[error("invalid sequence {input:?}: {reason}")]
    InvalidSequence { input: String, reason: String },

    /// Unknown encoding name.
    #[error("unknown encoding: {0}")]
    InvalidEncoding(String),

    /// Hex decoding error.
    #[error("hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Base64 decoding error.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
