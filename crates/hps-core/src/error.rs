//! Unified error types for the sizing workspace
//!
//! [`HpsError`] is the common error representation at API boundaries. The
//! domain-specific errors ([`BoundsError`], the sizing and optimizer errors in
//! `hps-algo`) convert into it so callers can use a single `?` chain.
//!
//! # Example
//!
//! ```
//! use hps_core::{Bounds, HpsResult};
//!
//! fn build() -> HpsResult<Bounds> {
//!     let bounds = Bounds::new(vec![0.0, 0.0], vec![10.0, 5.0])?;
//!     Ok(bounds)
//! }
//!
//! assert!(build().is_ok());
//! ```

use crate::bounds::BoundsError;
use thiserror::Error;

/// Unified error type for all sizing operations.
#[derive(Error, Debug)]
pub enum HpsError {
    /// I/O errors (config files, result files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using HpsError.
pub type HpsResult<T> = Result<T, HpsError>;

impl From<BoundsError> for HpsError {
    fn from(err: BoundsError) -> Self {
        HpsError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HpsError::Config("population size 1 is below the minimum of 3".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("population size 1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HpsError = io_err.into();
        assert!(matches!(err, HpsError::Io(_)));
    }

    #[test]
    fn test_bounds_error_becomes_config_error() {
        let err: HpsError = BoundsError::Empty.into();
        assert!(matches!(err, HpsError::Config(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> HpsResult<()> {
            Err(HpsError::Parse("test".into()))
        }

        fn outer() -> HpsResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
