//! Error types for the CRC crate.

use thiserror::Error;

/// Errors that can occur when describing or looking up CRC models.
#[derive(Debug, Error)]
pub enum Error {
    /// Width outside of the range supported by an operation.
    #[error("unsupported CRC width {width}: expected {min}..={max}")]
    UnsupportedWidth { width: u32, min: u32, max: u32 },

    /// A CRC parameter string could not be parsed.
    #[error("invalid CRC model: {0}")]
    InvalidModel(String),

    /// The embedded catalogue is malformed.
    #[error("embedded CRC catalogue is corrupt at {entry}: {reason} (this is a packaging defect)")]
    Catalogue { entry: String, reason: String },
}

/// Result type for CRC operations.
pub type Result<T> = std::result::Result<T, Error>;
