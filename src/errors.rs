//! Error types for modelbench
//!
//! One typed error enum for the library; the binary and config layer use
//! anyhow and convert at the boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the modelbench harness
#[derive(Error, Debug)]
pub enum BenchError {
    /// Storage directory could not be created
    #[error("Failed to prepare storage directory {path}: {source}")]
    StorageInit {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Destination file absent or empty after a copy that reported no error
    #[error("Model install incomplete: {path} is missing or empty after copy")]
    InstallIncomplete { path: PathBuf },

    /// Engine API errors
    #[error("Engine API error: {0}")]
    EngineApi(String),

    /// Streaming errors
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Harness error: {0}")]
    Generic(String),
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Convert anyhow errors to BenchError
impl From<anyhow::Error> for BenchError {
    fn from(err: anyhow::Error) -> Self {
        BenchError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_incomplete_display() {
        let err = BenchError::InstallIncomplete {
            path: PathBuf::from("/data/models/starter.gguf"),
        };
        assert!(err.to_string().contains("starter.gguf"));
        assert!(err.to_string().contains("missing or empty"));
    }

    #[test]
    fn test_storage_init_display() {
        let err = BenchError::StorageInit {
            path: PathBuf::from("/data/models"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/data/models"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: BenchError = io.into();
        assert!(matches!(err, BenchError::IoError(_)));
    }
}
