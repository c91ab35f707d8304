//! Error types for flightcatalog.
//!
//! This module defines all error types used throughout the flightcatalog crate.
//! Record-level validation failures are not errors; see
//! [`Rejection`](crate::validate::Rejection).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flightcatalog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Document Errors ===
    /// The input document could not be parsed into `{"flights": [...]}`.
    #[error("malformed flight document: {message}")]
    MalformedDocument {
        /// Description of what went wrong.
        message: String,
    },

    /// Rendering the catalog to JSON failed.
    #[error("failed to serialize flights: {0}")]
    Serialization(#[source] serde_json::Error),

    // === Input Errors ===
    /// A timestamp string could not be parsed.
    #[error("invalid timestamp '{input}': expected YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
    },

    /// A date string could not be parsed.
    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    /// A time-span string could not be parsed.
    #[error("invalid duration '{input}': expected [-][d.]hh:mm:ss[.fffffff]")]
    InvalidDuration {
        /// The rejected input.
        input: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Reading a flight document from disk failed.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a flight document to disk failed.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for flightcatalog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a malformed document error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Create an invalid timestamp error.
    #[must_use]
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            input: input.into(),
        }
    }

    /// Create an invalid duration error.
    #[must_use]
    pub fn invalid_duration(input: impl Into<String>) -> Self {
        Self::InvalidDuration {
            input: input.into(),
        }
    }

    /// Check if this error means the input document was unusable.
    #[must_use]
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, Self::MalformedDocument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = Error::malformed("missing field `flights`");
        assert_eq!(
            err.to_string(),
            "malformed flight document: missing field `flights`"
        );
        assert!(err.is_malformed_document());
    }

    #[test]
    fn test_is_malformed_document() {
        assert!(!Error::invalid_duration("x").is_malformed_document());
        assert!(!Error::invalid_timestamp("x").is_malformed_document());
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let err = Error::invalid_timestamp("yesterday");
        let msg = err.to_string();
        assert!(msg.contains("yesterday"));
        assert!(msg.contains("YYYY-MM-DDTHH:MM:SS"));
    }

    #[test]
    fn test_invalid_duration_display() {
        let err = Error::invalid_duration("2h");
        assert!(err.to_string().contains("'2h'"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = Error::InvalidDate {
            input: "2023-13-01".to_string(),
        };
        assert!(err.to_string().contains("2023-13-01"));
    }

    #[test]
    fn test_serialization_error_source() {
        use std::error::Error as _;

        let json_err = serde_json::from_str::<i32>("not valid json").unwrap_err();
        let err = Error::Serialization(json_err);
        assert!(err.to_string().starts_with("failed to serialize flights"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_file_read_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::FileRead {
            path: PathBuf::from("/tmp/flights.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/flights.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_file_write_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::FileWrite {
            path: PathBuf::from("/root/forbidden.json"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden.json"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "page_size too large".to_string(),
        };
        assert!(err.to_string().contains("page_size too large"));
    }
}
