//! Error types for algorithm discovery.

use thiserror::Error;

use crate::StrategyKind;

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum Error {
    /// The request cannot be served by this strategy, e.g. an unsupported width.
    #[error("{strategy}: {reason}")]
    Parameter { strategy: StrategyKind, reason: String },

    /// The digest provider listed an algorithm it cannot create.
    #[error("internal error: {0}")]
    Internal(String),

    /// The embedded CRC catalogue could not be loaded.
    #[error(transparent)]
    Catalogue(hashsleuth_crc::Error),

    /// The digest registry could not be built.
    #[error(transparent)]
    Digest(#[from] hashsleuth_digest::Error),

    /// The search was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("search cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error only makes one strategy inapplicable.
    pub fn is_parameter(&self) -> bool {
        matches!(self, Error::Parameter { .. })
    }

    pub(crate) fn parameter(strategy: StrategyKind, reason: impl ToString) -> Self {
        Error::Parameter {
            strategy,
            reason: reason.to_string(),
        }
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, Error>;
