//! Error types for credential issuance

use thiserror::Error;

/// Result type for credential issuance
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Errors that can occur while minting an upload credential
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Presigning configuration is invalid (e.g. expiry out of range)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The presigned URL could not be produced, usually because no signing
    /// credentials could be resolved
    #[error("Signing error: {0}")]
    SigningError(String),
}
