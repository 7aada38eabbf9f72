//! Error types and utilities for Warden Bot

use thiserror::Error;

/// Result type alias for Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;

/// Main error type for Warden operations
#[derive(Error, Debug)]
pub enum WardenError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },

    /// Persistent store related errors
    #[error("Store error: {message}")]
    Store {
        /// Description of the failed store operation.
        message: String,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat transport related errors (IRC connection, sends)
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
        /// Underlying cause, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Profile service related errors (Twitch API lookups)
    #[error("Profile service error: {message}")]
    Profile {
        /// Description of the failed lookup.
        message: String,
        /// HTTP status returned by the service, when one was received.
        status: Option<u16>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WardenError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new store error with source
    pub fn store_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new transport error with source
    pub fn transport_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new profile service error
    pub fn profile(msg: impl Into<String>) -> Self {
        Self::Profile {
            message: msg.into(),
            status: None,
        }
    }

    /// Create a new profile service error with an HTTP status
    pub fn profile_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Profile {
            message: msg.into(),
            status: Some(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let config_error = WardenError::config("missing token");
        assert_eq!(
            config_error.to_string(),
            "Configuration error: missing token"
        );

        let store_error = WardenError::store("write failed");
        assert!(store_error.to_string().contains("Store error"));

        let profile_error = WardenError::profile_with_status("rate limited", 429);
        assert!(profile_error.to_string().contains("rate limited"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let wrapped = WardenError::store_with_source("failed to load data file", io_error);

        assert!(wrapped.to_string().contains("failed to load data file"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let warden_error: WardenError = io_error.into();
        assert!(warden_error.to_string().contains("I/O error"));
    }
}
