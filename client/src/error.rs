//! Error types for the upload flow

use thiserror::Error;

use crate::policy::FileSize;

/// A file was refused before any network call was made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// File is larger than the policy ceiling
    #[error("File size exceeds {limit} limit")]
    TooLarge {
        /// Size of the rejected file
        size: FileSize,
        /// Ceiling
        limit: FileSize,
    },

    /// Declared content type is not on the allow-list
    #[error("Unsupported file type. Only images, text, documents, and PDFs are allowed.")]
    UnsupportedType {
        /// The declared content type that was refused
        content_type: String,
    },
}

/// The upload server could not be reached or did not hand out a URL
#[derive(Error, Debug)]
pub enum RequestError {
    /// Transport failure talking to the upload server
    #[error("Could not reach the upload server: {0}")]
    Network(#[source] reqwest::Error),

    /// Upload server answered with a non-success status
    #[error("Server error: {0}")]
    Status(u16),

    /// Success status but the body was not an upload URL response
    #[error("Invalid response from the upload server: {0}")]
    InvalidResponse(#[source] reqwest::Error),
}

impl RequestError {
    /// HTTP status returned by the upload server, if one was received
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Network(_) | Self::InvalidResponse(_) => None,
        }
    }
}

/// Writing the bytes to storage failed
#[derive(Error, Debug)]
pub enum UploadError {
    /// Transport failure talking to storage
    #[error("Upload failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Storage rejected the write (expired URL, wrong method, size mismatch...)
    #[error("Upload failed: {0}")]
    Status(u16),
}

impl UploadError {
    /// HTTP status returned by storage, if one was received
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Network(_) => None,
        }
    }
}

/// Why a submission ended in the failed state
#[derive(Error, Debug)]
pub enum UploadFailure {
    /// Submit was attempted without a validated file
    #[error("Please select a file")]
    NotReady,

    /// No upload URL could be obtained
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The write to storage failed
    #[error(transparent)]
    Upload(#[from] UploadError),
}
