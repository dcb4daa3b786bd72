//! Error types for the Docker volume frontend
//!
//! Provides structured error types for storage class resolution, volume
//! config construction, option parsing and configuration loading.

use thiserror::Error;

/// Unified error type for the frontend
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Storage Class Errors
    // =========================================================================
    #[error("Could not hash storage class attributes: {reason}")]
    StorageClassHash { reason: String },

    #[error("Could not add storage class {name}: {reason}")]
    StorageClassRegistration { name: String, reason: String },

    #[error("Invalid attribute request {name}: {reason}")]
    AttributeParse { name: String, reason: String },

    // =========================================================================
    // Volume Errors
    // =========================================================================
    #[error("Error creating volume: invalid size {value:?}: {reason}")]
    VolumeSize { value: String, reason: String },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Capacity parse error: {0}")]
    CapacityParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the caller may retry the failed operation unchanged
    ///
    /// Registration is decided by the orchestrator, so a rejected class may
    /// be accepted later. Everything else is derived from the request itself.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::StorageClassRegistration { .. } | Error::Io(_) | Error::Internal(_)
        )
    }

    /// Process exit status for a failed command
    ///
    /// Retryable failures map to `EX_TEMPFAIL` (75), everything else to 1.
    pub fn exit_code(&self) -> u8 {
        if self.is_retryable() {
            75
        } else {
            1
        }
    }
}

/// Result type alias for the frontend
pub type Result<T> = std::result::Result<T, Error>;
