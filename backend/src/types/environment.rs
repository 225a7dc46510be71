//! Environment configuration for different deployment stages

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};

/// Validity window of a presigned URL unless overridden
pub const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 60;

/// Longest validity S3 accepts for a SigV4 presigned URL (7 days)
pub const MAX_PRESIGNED_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

const DEFAULT_AWS_REGION: &str = "ap-south-1";
const DEFAULT_PORT: u16 = 8080;

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "direct-uploads".to_string())
            }
        }
    }

    /// Region the bucket lives in
    #[must_use]
    pub fn aws_region(&self) -> String {
        env::var("AWS_REGION")
            .ok()
            .filter(|region| !region.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string())
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Filter directive used when `RUST_LOG` is not set
    #[must_use]
    pub const fn default_log_filter(&self) -> &'static str {
        match self {
            Self::Production | Self::Staging => "info",
            Self::Development => "debug",
        }
    }

    /// Returns the endpoint URL to use for S3, e.g. a `LocalStack` or `MinIO` instance
    #[must_use]
    pub fn override_s3_endpoint_url(&self) -> Option<String> {
        env::var("S3_ENDPOINT_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.aws_region()))
            .load()
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_s3_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Custom endpoints (LocalStack, MinIO) don't resolve virtual-hosted buckets
        if self.override_s3_endpoint_url().is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Presigned URL expiry time in seconds
    ///
    /// Defaults to 60 seconds. `PRESIGNED_URL_EXPIRY_SECS` overrides it in every
    /// environment; the value is clamped to `1..=MAX_PRESIGNED_URL_EXPIRY_SECS`
    /// and unparseable values fall back to the default.
    #[must_use]
    pub fn presigned_url_expiry_secs(&self) -> u64 {
        env::var("PRESIGNED_URL_EXPIRY_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .map_or(DEFAULT_PRESIGNED_URL_EXPIRY_SECS, |secs| {
                secs.clamp(1, MAX_PRESIGNED_URL_EXPIRY_SECS)
            })
    }

    /// Port the HTTP server listens on
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number
    pub fn port(&self) -> Result<u16, std::num::ParseIntError> {
        env::var("PORT").map_or(Ok(DEFAULT_PORT), |p| p.trim().parse())
    }

    /// Directory of front-end assets served for unmatched paths, if any
    #[must_use]
    pub fn static_assets_dir(&self) -> Option<PathBuf> {
        env::var("STATIC_ASSETS_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
    }
}
