//! Error types for memolibre-core.

use thiserror::Error;

/// Result type alias using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors returned by deck operations.
///
/// A returned error never comes with a modified deck: the caller keeps the
/// deck it passed in.
#[derive(Debug, Error)]
pub enum DeckError {
    /// Bad user input (duplicate front side, bad tag key, empty selection...).
    #[error("{0}")]
    Validation(String),

    /// A card number referenced by the caller or by the practice history
    /// does not exist in the deck.
    #[error("card with number {0} not found")]
    CardNotFound(u32),

    #[error("invalid search pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid deck document: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeckError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error came from user input rather than an inconsistent deck.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidPattern { .. })
    }
}
