//! Upload credential issuer: mints presigned PUT URLs for direct-to-bucket uploads

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Presigned URL issuance
pub mod credential_issuer;

/// HTTP routes
pub mod routes;

/// Server setup
pub mod server;

/// Configuration and error types
pub mod types;
