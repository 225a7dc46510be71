//! A file picked by the user, with the metadata it declares

use std::path::Path;

use bytes::Bytes;

/// Content type declared when nothing better is known
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A selected file: name, size, declared content type and its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    name: String,
    content_type: String,
    bytes: Bytes,
}

impl FileSelection {
    /// Creates a selection from bytes already in memory
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk
    ///
    /// The declared content type is `content_type` when given, otherwise it is
    /// guessed from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub async fn from_path(
        path: impl AsRef<Path>,
        content_type: Option<&str>,
    ) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            });

        let content_type = content_type.map_or_else(
            || {
                mime_guess::from_path(path)
                    .first_raw()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string()
            },
            ToString::to_string,
        );

        Ok(Self::new(name, content_type, bytes))
    }

    /// File name without directories
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared content type, sent as-is with the upload
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Raw file contents
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Whether the declared type is an image
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type
            .parse::<mime::Mime>()
            .is_ok_and(|parsed| parsed.type_() == mime::IMAGE)
    }
}
