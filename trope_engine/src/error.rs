//! Error types for the recommendation pipeline.

use thiserror::Error;
use trope_corpus::{StoreError, Trope};

/// Why a recommendation request failed.
///
/// The first three variants are user-facing: the caller should ask for
/// different input. [`RecommendError::Store`] is a system fault.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Input could not be read as a comma-separated trope list.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Too few tropes survived normalization and store validation.
    #[error(
        "Not enough tropes for analysis ({found} recognized, {required} needed). Please try again with more tropes."
    )]
    InsufficientTropes { found: usize, required: usize },

    /// The validated tropes have no neighbor in common.
    #[error("No shared associations. Please try again with different tropes.")]
    NoSharedAssociations { seeds: Vec<Trope> },

    /// The association store failed underneath the engine.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecommendError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether re-prompting the user with different input can fix this.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RecommendError::Store(_))
    }
}
