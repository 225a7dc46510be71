//! Sequential upload of several files from disk

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::{
    form::UploadForm,
    orchestrator::{UploadOrchestrator, UploadReceipt},
    policy::{format_file_size, UploadPolicy},
    selection::FileSelection,
};

/// A file that did not make it to storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Path as given by the caller
    pub path: PathBuf,
    /// User-facing explanation
    pub reason: String,
}

/// Outcome of `upload_files`
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Receipts of stored files, in input order
    pub uploaded: Vec<UploadReceipt>,
    /// Files that were unreadable, rejected or failed to upload, in input order
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Whether every file was uploaded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of files attempted
    #[must_use]
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }

    fn record_failure(&mut self, path: &Path, reason: String) {
        error!("{}: {reason}", path.display());
        self.failed.push(BatchFailure {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Uploads `paths` one at a time, each through its own form
///
/// A file that cannot be read or fails validation never reaches the network.
/// One failure does not stop the remaining files. `content_type` overrides
/// the type guessed from each file's extension.
pub async fn upload_files(
    orchestrator: &UploadOrchestrator,
    policy: &UploadPolicy,
    paths: &[PathBuf],
    content_type: Option<&str>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in paths {
        let selection = match FileSelection::from_path(path, content_type).await {
            Ok(selection) => selection,
            Err(e) => {
                report.record_failure(path, format!("Could not read file: {e}"));
                continue;
            }
        };

        let mut form = UploadForm::new();
        if let Err(e) = form.select(selection, policy) {
            report.record_failure(path, e.to_string());
            continue;
        }

        match orchestrator.submit(&mut form).await {
            Ok(receipt) => {
                info!(
                    "{} ({}) uploaded at {}",
                    receipt.file_name,
                    format_file_size(receipt.size),
                    receipt.uploaded_at.format("%H:%M:%S")
                );
                report.uploaded.push(receipt);
            }
            Err(e) => report.record_failure(path, e.to_string()),
        }
    }

    report
}
