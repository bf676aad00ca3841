//! Error types for code-signing operations.
//!
//! Only configuration problems are fatal errors. Failed tool invocations are
//! reported through [`crate::signing::SignReport`] instead, because a failed
//! per-file sign must not abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for signing operations
pub type Result<T> = std::result::Result<T, SignError>;

/// Main error type for all signing operations
#[derive(Error, Debug)]
pub enum SignError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Missing or unusable configuration, raised before any subprocess runs
    #[error("Configuration error: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// The bundle root does not exist or is not a directory
    #[error("Bundle not found: {} is not a directory", path.display())]
    BundleNotFound {
        /// Path that was given as the bundle root
        path: PathBuf,
    },

    /// An external tool could not be found or spawned
    #[error("Failed to run {program}: {reason}")]
    Tool {
        /// Program name (`security`, `codesign`)
        program: String,
        /// Reason for the error
        reason: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl SignError {
    /// Shorthand for a [`SignError::Config`] error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
