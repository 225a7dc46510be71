//! Per-submission context: the selected file and where the flow stands

use crate::{error::ValidationError, policy::UploadPolicy, selection::FileSelection};

/// Where a form is in the upload flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    /// Nothing selected, submit is not permitted
    Idle,
    /// A validated file is waiting to be submitted
    Selected,
    /// Asking the server for an upload URL
    Requesting,
    /// Sending the bytes to storage
    Uploading,
    /// The file is stored at `location`
    Succeeded {
        /// Public location of the uploaded object
        location: String,
    },
    /// The submission stopped at `reason`
    Failed {
        /// User-facing explanation
        reason: String,
    },
}

/// State of one upload form
///
/// Carries what used to live in page-level globals so the flow can be driven
/// and tested without any rendering surface.
#[derive(Debug, Clone)]
pub struct UploadForm {
    state: UploadState,
    selection: Option<FileSelection>,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadForm {
    /// Creates an idle form
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: UploadState::Idle,
            selection: None,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &UploadState {
        &self.state
    }

    /// The selected file, if any
    #[must_use]
    pub const fn selection(&self) -> Option<&FileSelection> {
        self.selection.as_ref()
    }

    /// Whether the submit control should be enabled
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        matches!(self.state, UploadState::Selected) && self.selection.is_some()
    }

    /// Whether a submission is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.state, UploadState::Requesting | UploadState::Uploading)
    }

    /// Validates and stores a newly picked file
    ///
    /// A rejected file leaves the form exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` produced by `policy`
    pub fn select(
        &mut self,
        selection: FileSelection,
        policy: &UploadPolicy,
    ) -> Result<(), ValidationError> {
        if let Err(e) = policy.validate(&selection) {
            tracing::debug!("Rejected {}: {e}", selection.name());
            return Err(e);
        }

        self.selection = Some(selection);
        self.state = UploadState::Selected;
        Ok(())
    }

    /// Drops the selection and returns to `Idle`
    pub fn clear(&mut self) {
        self.selection = None;
        self.state = UploadState::Idle;
    }

    /// Dismisses a terminal state
    ///
    /// After a success the selection is already gone, so the form is `Idle`.
    /// After a failure the selection is kept and the form is `Selected` again,
    /// ready for an explicit retry.
    ///
    /// A form still `Requesting` or `Uploading` here belongs to a submission
    /// that was dropped before finishing (`submit` holds the form mutably
    /// while it runs), and is reset the same way as a failure.
    pub fn acknowledge(&mut self) {
        match self.state {
            UploadState::Succeeded { .. }
            | UploadState::Failed { .. }
            | UploadState::Requesting
            | UploadState::Uploading => {
                self.state = if self.selection.is_some() {
                    UploadState::Selected
                } else {
                    UploadState::Idle
                };
            }
            _ => {}
        }
    }

    /// Moves `Selected` to `Requesting` and hands out the file to send
    pub(crate) fn begin_submission(&mut self) -> Option<FileSelection> {
        if !self.can_submit() {
            return None;
        }
        self.state = UploadState::Requesting;
        self.selection.clone()
    }

    pub(crate) fn mark_uploading(&mut self) {
        self.state = UploadState::Uploading;
    }

    pub(crate) fn succeed(&mut self, location: String) {
        self.selection = None;
        self.state = UploadState::Succeeded { location };
    }

    pub(crate) fn fail(&mut self, reason: String) {
        self.state = UploadState::Failed { reason };
    }
}
