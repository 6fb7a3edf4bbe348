//! Error types for sequence mutations.

use thiserror::Error;

/// Errors that can occur when applying a mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("Invalid index: {index} (length: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Change description missing: compute_diff must run before apply")]
    DiffMissing,
}

pub type Result<T> = std::result::Result<T, ListError>;
