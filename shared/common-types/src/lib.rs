use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response of `GET /s3Url`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadUrlResponse {
    /// Presigned URL authorizing a single PUT of the object
    pub url: String,
    /// Object key the URL writes to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// RFC 3339 UTC timestamp after which the URL is rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}
