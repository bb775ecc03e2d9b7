//! Domain Errors
//!
//! Error types for catalog lookups, profile construction and session runs.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown {category} key: {key}")]
    UnknownKey { category: String, key: String },

    #[error("Profile index {index} not available. Max index: {max}")]
    ProfileIndexOutOfRange { index: usize, max: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    pub fn unknown_key<C: AsRef<str>, K: AsRef<str>>(category: C, key: K) -> Self {
        Self::UnknownKey {
            category: category.as_ref().to_string(),
            key: key.as_ref().to_string(),
        }
    }

    pub fn external<T: std::fmt::Display>(err: T) -> Self {
        Self::ExternalService(err.to_string())
    }

    /// True for errors caused by configuration rather than an external call
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownKey { .. } | Self::ProfileIndexOutOfRange { .. } | Self::Validation(_)
        )
    }
}
