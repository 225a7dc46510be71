use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use upload_client::{upload_files, TracingReporter, UploadOrchestrator, UploadPolicy};

/// Upload files straight to the bucket through presigned URLs
#[derive(Debug, Parser)]
#[command(name = "upload", version)]
struct Cli {
    /// Base URL of the credential server
    #[arg(long, env = "UPLOAD_API_BASE_URL", default_value = "http://localhost:8080")]
    endpoint: String,

    /// Content type to declare instead of guessing it from the extension
    #[arg(long)]
    content_type: Option<String>,

    /// Files to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let policy = UploadPolicy::default();
    let orchestrator =
        UploadOrchestrator::new(&cli.endpoint).with_reporter(Arc::new(TracingReporter));

    let report = upload_files(
        &orchestrator,
        &policy,
        &cli.files,
        cli.content_type.as_deref(),
    )
    .await;

    for receipt in &report.uploaded {
        println!("{}", receipt.location);
    }

    if !report.is_success() {
        anyhow::bail!("{} of {} uploads failed", report.failed.len(), report.total());
    }

    Ok(())
}
