//! Loader error types.
//!
//! Errors returned by an [`EntryLoader`](crate::EntryLoader). The schema
//! layer forwards them unchanged to the query engine.

use std::fmt;

/// Errors that can occur during loader operations.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The requested entry was not found.
    #[error("Entry not found: {content_type}/{id}")]
    NotFound {
        /// The content type that was searched.
        content_type: String,
        /// The entry id that was not found.
        id: String,
    },

    /// The arguments passed to the loader are not acceptable.
    #[error("Invalid arguments: {message}")]
    InvalidArguments {
        /// Description of the problem.
        message: String,
    },

    /// An entry handed to the loader is malformed.
    #[error("Invalid entry: {message}")]
    InvalidEntry {
        /// Description of why the entry is invalid.
        message: String,
    },

    /// The backing store could not be reached.
    #[error("Loader unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// An internal loader error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl LoaderError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(content_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            content_type: content_type.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidArguments` error.
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidEntry` error.
    #[must_use]
    pub fn invalid_entry(message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            message: message.into(),
        }
    }

    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the error category for logging and error extensions.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidArguments { .. } | Self::InvalidEntry { .. } => ErrorCategory::Validation,
            Self::Unavailable { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Machine readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            Self::InvalidEntry { .. } => "INVALID_ENTRY",
            Self::Unavailable { .. } => "LOADER_UNAVAILABLE",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Categories of loader errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Entry not found.
    NotFound,
    /// Bad input.
    Validation,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
