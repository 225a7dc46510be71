mod credentials;
mod docs;
mod health;

use aide::axum::{routing::get, ApiRouter};

pub use credentials::issue_upload_url;

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .api_route("/s3Url", get(credentials::issue_upload_url))
}
