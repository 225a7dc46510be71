//! Client side of direct-to-bucket uploads
//!
//! A file is validated locally, a presigned URL is requested from the
//! credential server, and the bytes go straight to storage with a single PUT.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Multi-file uploads
pub mod batch;

/// Upload flow errors
pub mod error;

/// Per-submission form state
pub mod form;

/// Submission driver
pub mod orchestrator;

/// Size and type policy
pub mod policy;

/// Progress reporting
pub mod progress;

/// Selected files
pub mod selection;

pub use batch::{upload_files, BatchFailure, BatchReport};
pub use error::{RequestError, UploadError, UploadFailure, ValidationError};
pub use form::{UploadForm, UploadState};
pub use orchestrator::{public_location, UploadOrchestrator, UploadReceipt};
pub use policy::{format_file_size, FileSize, UploadPolicy};
pub use progress::{ChannelReporter, ProgressEvent, ProgressReporter, TracingReporter};
pub use selection::FileSelection;
