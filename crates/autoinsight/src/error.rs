//! Error types for autoinsight.
//!
//! This module defines all error types used throughout the autoinsight crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for autoinsight operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
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

    // === Ingest Errors ===
    /// A sample source could not deliver raw telemetry text.
    ///
    /// Ingest handles this fail-soft (logged, empty sample set); the variant
    /// exists so sources can report what actually went wrong.
    #[error("sample source '{name}' unavailable: {message}")]
    SourceFetch {
        /// Name of the sample source.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === Vault Errors ===
    /// The vault key file could not be loaded or created.
    #[error("vault key unusable at {path}: {message}")]
    VaultKey {
        /// Path to the key file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// Sealing a record into an opaque string failed.
    #[error("failed to seal record: {message}")]
    VaultSeal {
        /// Description of what went wrong.
        message: String,
    },

    /// Opening an opaque string back into a record failed.
    ///
    /// Covers truncated blobs, tampered ciphertext, and wrong keys alike;
    /// the vault does not distinguish between them.
    #[error("failed to open sealed record: {message}")]
    VaultOpen {
        /// Description of what went wrong.
        message: String,
    },

    // === Profile Errors ===
    /// A profile record failed validation.
    #[error("invalid profile: {message}")]
    ProfileValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// No profile has been stored yet.
    #[error("no profile stored")]
    ProfileMissing,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for autoinsight operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new sample source error.
    #[must_use]
    pub fn source_fetch(name: &'static str, message: impl Into<String>) -> Self {
        Self::SourceFetch {
            name,
            message: message.into(),
        }
    }

    /// Create a new seal error.
    #[must_use]
    pub fn vault_seal(message: impl Into<String>) -> Self {
        Self::VaultSeal {
            message: message.into(),
        }
    }

    /// Create a new open error.
    #[must_use]
    pub fn vault_open(message: impl Into<String>) -> Self {
        Self::VaultOpen {
            message: message.into(),
        }
    }

    /// Create a new profile validation error.
    #[must_use]
    pub fn profile_validation(message: impl Into<String>) -> Self {
        Self::ProfileValidation {
            message: message.into(),
        }
    }

    /// Check if this error indicates that no profile has been stored.
    #[must_use]
    pub fn is_profile_missing(&self) -> bool {
        matches!(self, Self::ProfileMissing)
    }

    /// Check if this error came from the vault layer.
    #[must_use]
    pub fn is_vault_error(&self) -> bool {
        matches!(
            self,
            Self::VaultKey { .. } | Self::VaultSeal { .. } | Self::VaultOpen { .. }
        )
    }
}
