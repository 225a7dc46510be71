//! Size and type rules a file must satisfy before it is uploaded

use std::fmt;

use crate::{error::ValidationError, selection::FileSelection};

/// Default size ceiling: 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Content types accepted by default, with the label shown to users
pub const DEFAULT_ALLOWED_TYPES: &[AllowedType] = &[
    AllowedType::new("image/jpeg", "JPEG Image"),
    AllowedType::new("image/png", "PNG Image"),
    AllowedType::new("image/gif", "GIF Image"),
    AllowedType::new("image/webp", "WebP Image"),
    AllowedType::new("text/plain", "Text File"),
    AllowedType::new("application/pdf", "PDF Document"),
    AllowedType::new("application/msword", "Word Document"),
    AllowedType::new(
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "Word Document",
    ),
];

/// One entry of the content type allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedType {
    /// Exact MIME type, e.g. `image/png`
    pub mime: &'static str,
    /// Human readable label
    pub label: &'static str,
}

impl AllowedType {
    /// Creates an allow-list entry
    #[must_use]
    pub const fn new(mime: &'static str, label: &'static str) -> Self {
        Self { mime, label }
    }
}

/// Validation policy applied when a file is selected
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Largest accepted file in bytes
    pub max_file_size: u64,
    /// Accepted content types
    pub allowed_types: &'static [AllowedType],
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_types: DEFAULT_ALLOWED_TYPES,
        }
    }
}

impl UploadPolicy {
    /// Checks a selection against the size ceiling, then the allow-list
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TooLarge` if the file exceeds the ceiling,
    /// whatever its type, and `ValidationError::UnsupportedType` otherwise if
    /// its declared type is not allowed
    pub fn validate(&self, selection: &FileSelection) -> Result<(), ValidationError> {
        if selection.size() > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size: FileSize(selection.size()),
                limit: FileSize(self.max_file_size),
            });
        }

        if self.type_label(selection.content_type()).is_none() {
            return Err(ValidationError::UnsupportedType {
                content_type: selection.content_type().to_string(),
            });
        }

        Ok(())
    }

    /// Label of an allowed content type, `None` when the type is not allowed
    ///
    /// The declared type must equal an allow-list entry exactly; it is sent
    /// verbatim as the upload's `Content-Type`.
    #[must_use]
    pub fn type_label(&self, content_type: &str) -> Option<&'static str> {
        self.allowed_types
            .iter()
            .find(|allowed| allowed.mime == content_type)
            .map(|allowed| allowed.label)
    }
}

/// A byte count that displays in human units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileSize(pub u64);

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_file_size(self.0))
    }
}

/// Renders a byte count the way users read it: `0 Bytes`, `1.5 KB`, `10.0 MB`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
