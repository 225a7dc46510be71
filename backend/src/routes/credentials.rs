use std::sync::Arc;

use axum::{Extension, Json};
use common_types::UploadUrlResponse;
use tracing::instrument;

use crate::{credential_issuer::CredentialIssuer, types::AppError};

/// Issues a presigned URL for uploading one file directly to the bucket
///
/// Every call mints a new random object key, so two calls never hand out the
/// same destination. The URL authorizes a single PUT and stops working once
/// the configured expiry elapses.
///
/// # Errors
///
/// - `CredentialError::SigningError` - no signing credentials or the SDK refused to sign
/// - `CredentialError::ConfigError` - the configured expiry is out of range
#[instrument(skip(credential_issuer))]
pub async fn issue_upload_url(
    Extension(credential_issuer): Extension<Arc<CredentialIssuer>>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let credential = credential_issuer.issue().await?;

    tracing::info!("issued upload url for key: {}", credential.key);

    Ok(Json(UploadUrlResponse {
        url: credential.url,
        key: Some(credential.key),
        expires_at: Some(credential.expires_at.to_rfc3339()),
    }))
}
