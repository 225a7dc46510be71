// Not every utils is used in every test, so we allow dead code
#![allow(dead_code)]

use std::sync::Arc;

use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{BehaviorVersion, Region},
    Client as S3Client,
};
use axum::{body::Body, http::Request, response::Response, Router};
use backend::{credential_issuer::CredentialIssuer, server, types::Environment};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_BUCKET: &str = "direct-uploads-test";

/// Initialize tracing once for the whole test binary
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// S3 client that presigns offline with fixed credentials
pub fn offline_s3_client(with_credentials: bool) -> S3Client {
    let mut builder = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("ap-south-1"));

    if with_credentials {
        builder = builder.credentials_provider(Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            None,
            None,
            "test",
        ));
    }

    S3Client::from_conf(builder.build())
}

/// Router wired with real dependencies, minus any network access
pub struct TestSetup {
    pub router: Router,
    pub credential_issuer: Arc<CredentialIssuer>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Setup whose S3 client cannot resolve signing credentials
    pub fn without_signing_credentials() -> Self {
        Self::build(false)
    }

    fn build(with_credentials: bool) -> Self {
        setup_test_env();

        let credential_issuer = Arc::new(CredentialIssuer::new(
            Arc::new(offline_s3_client(with_credentials)),
            TEST_BUCKET.to_string(),
            60,
        ));

        let router = server::router(Environment::Development, credential_issuer.clone());

        Self {
            router,
            credential_issuer,
        }
    }

    pub async fn send_request(
        &self,
        request: Request<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        self.send_request(request).await
    }
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
