//! Error kinds shared by the search client, the accumulator and discovery.

use thiserror::Error;

/// Result type alias using [`FinderError`]
pub type FinderResult<T> = std::result::Result<T, FinderError>;

/// Failures that can surface while talking to the book search API.
///
/// An empty result page is not an error: zero items is a valid response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    /// Network failure, non-success status or an undecodable body.
    #[error("transport error: {0}")]
    Transport(String),

    /// A required credential or setting is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FinderError {
    pub fn transport(message: impl Into<String>) -> Self {
        FinderError::Transport(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        FinderError::Configuration(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, FinderError::Configuration(_))
    }
}
