//! Error types for catalog loading and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a fixture catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid catalog JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A fixture name contains characters outside the allowed set.
    #[error("invalid fixture name '{0}'")]
    InvalidName(String),

    /// A fixture appears more than once in the same catalog.
    #[error("duplicate fixture '{0}'")]
    Duplicate(String),

    /// A fixture field holds a value the matrix cannot use.
    #[error("fixture '{fixture}': {message}")]
    InvalidField { fixture: String, message: String },
}

impl CatalogError {
    /// Creates an [`CatalogError::InvalidField`] error.
    pub fn invalid_field(fixture: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            fixture: fixture.into(),
            message: message.into(),
        }
    }
}
