//! Error types for rolegate
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API;
//! the binary wraps them in `anyhow` at the top level.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),
}

/// Configuration and manifest errors
///
/// Every variant is fatal at startup; there is no partial-load mode.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Unsupported manifest format '{extension}' (expected toml, json, jsonc or json5)")]
    UnsupportedFormat { extension: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by callers that turn a failed permission check into an error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Access denied for identity {identity} on '{permission}': {reason}")]
pub struct AccessDeniedError {
    pub identity: u64,
    pub permission: String,
    pub reason: String,
}

impl AccessDeniedError {
    pub fn new(identity: u64, permission: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identity,
            permission: permission.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_admin(identity: u64, permission: impl Into<String>) -> Self {
        Self::new(identity, permission, "no admin with this identity")
    }

    pub fn missing_permission(identity: u64, permission: impl Into<String>) -> Self {
        Self::new(identity, permission, "permission not granted")
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_constructors() {
        let err = AccessDeniedError::unknown_admin(42, "System:Kick");
        assert_eq!(err.identity, 42);
        assert!(err.reason.contains("no admin"));

        let err = AccessDeniedError::missing_permission(7, "System:Ban");
        assert_eq!(err.permission, "System:Ban");
        assert!(err.to_string().contains("System:Ban"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let err: AppError = ConfigError::Missing {
            field: "manifest.path".to_string(),
        }
        .into();
        assert!(err.to_string().contains("manifest.path"));
    }
}
