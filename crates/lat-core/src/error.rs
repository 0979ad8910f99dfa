//! Unified error types for the LAT ecosystem
//!
//! This module provides a common error type [`LatError`] that can represent
//! errors from any part of the system. Domain-specific error types can be
//! converted to `LatError` for uniform error handling at API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use lat_core::{LatError, LatResult};
//!
//! fn run_system(path: &str) -> LatResult<()> {
//!     let system = load_system(path)?;
//!     simulate(&system)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all LAT operations.
///
/// This enum provides a common error representation for the LAT ecosystem,
/// allowing errors from I/O, parsing, reliability computation, and
/// validation to be handled uniformly.
#[derive(Error, Debug)]
pub enum LatError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (system XML, parameter files)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Simulation errors
    #[error("Simulation error: {0}")]
    Simulation(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using LatError.
pub type LatResult<T> = Result<T, LatError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for LatError {
    fn from(err: anyhow::Error) -> Self {
        LatError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for LatError {
    fn from(s: String) -> Self {
        LatError::Other(s)
    }
}

impl From<&str> for LatError {
    fn from(s: &str) -> Self {
        LatError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LatError::Simulation("no finite next event".into());
        assert!(err.to_string().contains("Simulation error"));
        assert!(err.to_string().contains("no finite next event"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let lat_err: LatError = io_err.into();
        assert!(matches!(lat_err, LatError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> LatResult<()> {
            Err(LatError::Validation("test".into()))
        }

        fn outer() -> LatResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
