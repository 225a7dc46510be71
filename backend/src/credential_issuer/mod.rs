//! Mints single-use presigned PUT URLs for direct-to-bucket uploads
mod error;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, Utc};
use rand::RngCore;
use tracing::debug;

pub use error::{CredentialError, CredentialResult};

/// Number of random bytes behind every object key
pub const OBJECT_KEY_BYTES: usize = 16;

/// A freshly minted upload authorization
#[derive(Debug, Clone)]
pub struct UploadCredential {
    /// Object key the URL writes to (hex encoded random bytes)
    pub key: String,
    /// The presigned URL for the PUT operation
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Issues upload credentials against a single bucket
pub struct CredentialIssuer {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    presigned_url_expiry_secs: u64,
}

impl CredentialIssuer {
    /// Creates a new credential issuer
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client, its credentials sign the URLs
    /// * `bucket_name` - Bucket the uploads land in
    /// * `presigned_url_expiry_secs` - Validity window of every issued URL
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            presigned_url_expiry_secs,
        }
    }

    /// Bucket the issued URLs point at
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Validity window of issued URLs in seconds
    #[must_use]
    pub const fn presigned_url_expiry_secs(&self) -> u64 {
        self.presigned_url_expiry_secs
    }

    /// Generates a random object key: 16 bytes from the OS RNG, lowercase hex
    #[must_use]
    pub fn generate_object_key() -> String {
        let mut raw = [0u8; OBJECT_KEY_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut raw);
        hex::encode(raw)
    }

    /// Mints a presigned URL authorizing one PUT to a brand new key
    ///
    /// Nothing is written anywhere; the returned credential is the only trace
    /// of the call.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::ConfigError` if the expiry is out of range
    /// Returns `CredentialError::SigningError` if the request could not be signed
    pub async fn issue(&self) -> CredentialResult<UploadCredential> {
        let key = Self::generate_object_key();
        let expiry = Duration::from_secs(self.presigned_url_expiry_secs);

        let presigning_config = PresigningConfig::expires_in(expiry).map_err(|e| {
            CredentialError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .presigned(presigning_config)
            .await
            .map_err(|e| {
                CredentialError::SigningError(format!("Failed to generate presigned URL: {e}"))
            })?;

        // Without a credentials provider the SDK takes its no-auth path and
        // hands back an unsigned URL that cannot authorize any write.
        let url = presigned_request.uri().to_string();
        if !url.contains("X-Amz-Signature=") {
            return Err(CredentialError::SigningError(
                "No signing credentials available for presigned URL".to_string(),
            ));
        }

        let expires_at: DateTime<Utc> = Utc::now() + expiry;

        debug!("Issued upload credential for key: {key} expires at: {expires_at}");

        Ok(UploadCredential {
            key,
            url,
            expires_at,
        })
    }
}
