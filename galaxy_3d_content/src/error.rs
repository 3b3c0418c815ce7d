//! Error types for the Galaxy3D content pipeline
//!
//! This module defines the recoverable error types used by the content
//! pipeline: file I/O, malformed blobs, registry (de)serialization and
//! backend failures.
//!
//! Contract violations (invalid free-list ids, double removal, dispatching an
//! unimplemented asset type) are not represented here: they panic.

use std::fmt;

/// Result type for content pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Content pipeline errors
#[derive(Debug, Clone)]
pub enum Error {
    /// File system error (missing file, permission denied, ...)
    Io(String),

    /// Malformed binary blob or file contents
    InvalidData(String),

    /// Registry or configuration (de)serialization failed
    Serialization(String),

    /// Backend refused or failed to create a resource
    BackendError(String),

    /// Operation needs a resource or asset that does not exist
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

impl From<ron::Error> for Error {
    fn from(error: ron::Error) -> Self {
        Error::Serialization(error.to_string())
    }
}

impl From<ron::error::SpannedError> for Error {
    fn from(error: ron::error::SpannedError) -> Self {
        Error::Serialization(error.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
