//! Drives one submission: credential request, upload, result

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common_types::UploadUrlResponse;
use reqwest::{header, Client};
use tracing::{debug, error, info, instrument};

use crate::{
    error::{RequestError, UploadError, UploadFailure},
    form::UploadForm,
    progress::{CosmeticProgress, NoopReporter, ProgressReporter, DEFAULT_PROGRESS_TICK},
    selection::FileSelection,
};

/// Path of the credential endpoint, relative to the base endpoint
pub const CREDENTIAL_PATH: &str = "/s3Url";

/// What the user is shown after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Name of the uploaded file
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
    /// Content type the file was stored with
    pub content_type: String,
    /// Public location of the object
    pub location: String,
    /// When the upload finished
    pub uploaded_at: DateTime<Utc>,
    /// Whether a preview can be rendered
    pub is_image: bool,
}

/// Public location of an object: the presigned URL without its query
///
/// Only valid because the bucket serves objects at the same path they are
/// written to.
#[must_use]
pub fn public_location(presigned_url: &str) -> &str {
    presigned_url
        .split_once('?')
        .map_or(presigned_url, |(location, _)| location)
}

/// Runs the upload flow against one credential server
pub struct UploadOrchestrator {
    base_url: String,
    http_client: Client,
    reporter: Arc<dyn ProgressReporter>,
    progress_tick: Duration,
}

impl UploadOrchestrator {
    /// Creates an orchestrator talking to the credential server at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
            reporter: Arc::new(NoopReporter),
            progress_tick: DEFAULT_PROGRESS_TICK,
        }
    }

    /// Uses a preconfigured HTTP client
    #[must_use]
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Sends progress events to `reporter`
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Changes the cosmetic progress interval
    #[must_use]
    pub const fn with_progress_tick(mut self, progress_tick: Duration) -> Self {
        self.progress_tick = progress_tick;
        self
    }

    /// Full URL of the credential endpoint
    #[must_use]
    pub fn credential_endpoint(&self) -> String {
        format!("{}{CREDENTIAL_PATH}", self.base_url)
    }

    /// Asks the server for a fresh presigned upload URL
    ///
    /// # Errors
    ///
    /// Returns `RequestError::Network` if the server cannot be reached,
    /// `RequestError::Status` for a non-success answer and
    /// `RequestError::InvalidResponse` if the body is not an upload URL response
    pub async fn request_upload_url(&self) -> Result<UploadUrlResponse, RequestError> {
        let response = self
            .http_client
            .get(self.credential_endpoint())
            .send()
            .await
            .map_err(RequestError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }

        response
            .json::<UploadUrlResponse>()
            .await
            .map_err(RequestError::InvalidResponse)
    }

    /// Writes the file to storage with a single PUT to `presigned_url`
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Network` on transport failure and
    /// `UploadError::Status` when storage rejects the write
    pub async fn put_object(
        &self,
        presigned_url: &str,
        selection: &FileSelection,
    ) -> Result<(), UploadError> {
        let response = self
            .http_client
            .put(presigned_url)
            .header(header::CONTENT_TYPE, selection.content_type())
            .body(selection.bytes().clone())
            .send()
            .await
            .map_err(UploadError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status.as_u16()));
        }

        Ok(())
    }

    /// Submits the form's selected file
    ///
    /// Exactly one credential is requested per call. Any failure ends the
    /// submission: nothing is retried and no second credential is requested.
    /// On success the selection is cleared. If the returned future is dropped
    /// before it resolves, the reporter still receives `Failed` and the form
    /// stays busy until `acknowledge` or `clear` resets it.
    ///
    /// # Errors
    ///
    /// Returns `UploadFailure::NotReady` unless the form is `Selected`,
    /// `UploadFailure::Request` if no upload URL was obtained (no upload is
    /// attempted then) and `UploadFailure::Upload` if storage refused the write
    #[instrument(skip_all, fields(endpoint = %self.base_url))]
    pub async fn submit(&self, form: &mut UploadForm) -> Result<UploadReceipt, UploadFailure> {
        let Some(selection) = form.begin_submission() else {
            return Err(UploadFailure::NotReady);
        };

        let progress = CosmeticProgress::start(self.reporter.clone(), self.progress_tick);

        match self.run(form, &selection).await {
            Ok(location) => {
                info!("Uploaded {} to {location}", selection.name());
                progress.complete().await;
                form.succeed(location.clone());

                Ok(UploadReceipt {
                    file_name: selection.name().to_string(),
                    size: selection.size(),
                    content_type: selection.content_type().to_string(),
                    location,
                    uploaded_at: Utc::now(),
                    is_image: selection.is_image(),
                })
            }
            Err(e) => {
                error!("Upload error: {e}");
                progress.fail().await;
                form.fail(e.to_string());
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        form: &mut UploadForm,
        selection: &FileSelection,
    ) -> Result<String, UploadFailure> {
        let credential = self.request_upload_url().await?;
        debug!("Received upload URL for key {:?}", credential.key);

        form.mark_uploading();
        self.put_object(&credential.url, selection).await?;

        Ok(public_location(&credential.url).to_string())
    }
}
