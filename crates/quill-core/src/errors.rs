//! Error types for quill-core.
//!
//! Two classes of failure, neither retryable:
//! - configuration: required fields missing at construction or
//!   materialization time
//! - validation: an enum or cross-reference constraint was violated
//!
//! Errors raised by nested operations during a bulk import are wrapped into a
//! single validation-class error carrying the original cause, so callers of
//! the import path handle one error shape.

use thiserror::Error;

/// Result alias used across quill-core.
pub type QuillResult<T> = Result<T, QuillError>;

#[derive(Debug, Error)]
pub enum QuillError {
    /// Required fields missing; the caller must fix inputs.
    #[error("configuration: {0}")]
    Configuration(String),

    /// A constraint was violated; the caller must fix inputs.
    #[error("validation: {0}")]
    Validation(String),

    /// A bulk import failed while applying one of its entries.
    #[error("validation: {message}")]
    Import {
        message: String,
        #[source]
        source: Box<QuillError>,
    },
}

impl QuillError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap an error raised while importing a raw mapping.
    pub fn import(msg: impl Into<String>, source: QuillError) -> Self {
        Self::Import {
            message: msg.into(),
            source: Box::new(source),
        }
    }

    /// True for the validation class, including wrapped import failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Import { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
