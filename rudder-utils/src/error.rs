//! Error types for rudder
//!
//! Provides a unified error type used across all rudder crates.

use std::path::PathBuf;

/// Main error type for rudder operations
#[derive(Debug, thiserror::Error)]
pub enum RudderError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Value Errors ===

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Value out of range: {0}")]
    Range(String),

    #[error("Invalid value: {0}")]
    Validation(String),

    // === Parameter Errors ===

    #[error("Unknown parameter: '{0}'")]
    UnknownParameter(String),

    #[error("Parameter '{0}' can only be set at startup")]
    Immutable(String),

    #[error("Parameter '{0}' appears twice in the same request")]
    Duplicate(String),

    #[error("Failed setting '{name}': {reason}")]
    Set { name: String, reason: String },

    #[error("Failed applying '{name}': {reason}")]
    Apply { name: String, reason: String },

    // === Startup File Errors ===

    #[error("Error in {file} at line {line}: '{text}': {reason}")]
    Load {
        file: String,
        line: usize,
        text: String,
        reason: String,
    },

    // === Service Errors ===

    #[error("Config service unavailable: {0}")]
    Service(String),

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RudderError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a range error
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The bare message for value errors, without the category prefix.
    /// Used when the message is embedded in a larger error string.
    pub fn reason(self) -> String {
        match self {
            Self::Parse(msg) | Self::Range(msg) | Self::Validation(msg) => msg,
            other => other.to_string(),
        }
    }

    /// The parameter name this error is about, if it names one
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::UnknownParameter(name)
            | Self::Immutable(name)
            | Self::Duplicate(name)
            | Self::Set { name, .. }
            | Self::Apply { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Result type alias using RudderError
pub type Result<T> = std::result::Result<T, RudderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RudderError::UnknownParameter("maxmemoryy".into());
        assert_eq!(err.to_string(), "Unknown parameter: 'maxmemoryy'");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RudderError::Io(io_err);
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = RudderError::FileWrite {
            path: PathBuf::from("/etc/rudder.conf"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write file"));
        assert!(msg.contains("/etc/rudder.conf"));
    }

    #[test]
    fn test_error_display_load() {
        let err = RudderError::Load {
            file: "rudder.conf".into(),
            line: 12,
            text: "maxmemory lots".into(),
            reason: "argument must be a memory value".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 12"));
        assert!(msg.contains("maxmemory lots"));
    }

    #[test]
    fn test_parameter_accessor() {
        let err = RudderError::Immutable("port".into());
        assert_eq!(err.parameter(), Some("port"));

        let err = RudderError::parse("bad token");
        assert_eq!(err.parameter(), None);
    }
}
