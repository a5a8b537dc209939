//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur talking to a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to connect to the registry.
    #[error("Failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The registry returned a non-success HTTP status.
    #[error("HTTP error from registry: {status} - {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("Malformed registry response: {message}")]
    MalformedResponse {
        /// What failed to decode.
        message: String,
    },

    /// The manifest response lacked the `Docker-Content-Digest` header.
    #[error("Header Docker-Content-Digest does not exist for {repository}:{tag}")]
    MissingContentDigest {
        /// Repository name.
        repository: String,
        /// Tag name.
        tag: String,
    },

    /// Credentials could not be turned into request headers.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                message: err.to_string(),
            }
        } else {
            Self::Http {
                status: err.status().map_or(0, |s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}
