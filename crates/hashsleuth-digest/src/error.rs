//! Error types for the digest crate.

use thiserror::Error;

/// Errors that can occur when looking up or creating digests.
#[derive(Debug, Error)]
pub enum Error {
    /// No algorithm with this id.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// CRC library error.
    #[error("{0}")]
    Crc(#[from] hashsleuth_crc::Error),
}

/// Result type for digest operations.
pub type Result<T> = std::result::Result<T, Error>;
