use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use backend::{credential_issuer::CredentialIssuer, server, types::Environment};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.default_log_filter()));

    // JSON logs for staging/production, human readable ones for development
    if environment.json_logs() {
        fmt().json().with_env_filter(env_filter).init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let credential_issuer = Arc::new(CredentialIssuer::new(
        s3_client,
        environment.s3_bucket(),
        environment.presigned_url_expiry_secs(),
    ));

    tracing::info!(
        bucket = credential_issuer.bucket_name(),
        expiry_secs = credential_issuer.presigned_url_expiry_secs(),
        "Credential issuer configured"
    );

    server::start(environment, credential_issuer).await
}
