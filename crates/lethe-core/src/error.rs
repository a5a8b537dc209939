//! Error types for Lethe core operations.

use thiserror::Error;

/// Boxed error produced by a [`crate::RegistryBackend`] implementation.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Lethe core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A retention rule failed validation.
    #[error("Invalid retention rule: {reason}")]
    InvalidRule {
        /// Reason the rule is invalid.
        reason: String,
    },

    /// An exception rule's image name matcher failed to compile.
    #[error("Invalid image name matcher '{pattern}': {source}")]
    InvalidNameMatcher {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// An exception rule's tag matcher failed to compile.
    #[error("Invalid image tag matcher '{pattern}': {source}")]
    InvalidTagMatcher {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A tag scheduled for deletion is missing from the scanned snapshot.
    #[error("Image [{image}:{tag}] doesn't exist")]
    TagNotFound {
        /// Image (repository) name.
        image: String,
        /// Tag name.
        tag: String,
    },

    /// A registry backend call failed.
    #[error("Registry request failed: {source}")]
    Registry {
        /// Underlying backend error.
        #[source]
        source: BackendError,
    },
}

impl From<BackendError> for Error {
    fn from(source: BackendError) -> Self {
        Self::Registry { source }
    }
}
