use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use upload_client::{
    ChannelReporter, FileSelection, ProgressEvent, RequestError, UploadError, UploadFailure,
    UploadForm, UploadOrchestrator, UploadPolicy, UploadState, ValidationError,
};
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OBJECT_KEY: &str = "5f2b9c0e4a7d4e1f8c3b6a9d0e2f4a6b";

fn presigned_url(storage: &MockServer) -> String {
    format!(
        "{}/{OBJECT_KEY}?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Expires=60&X-Amz-Signature=abc",
        storage.uri()
    )
}

async fn mount_credential(issuer: &MockServer, storage: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/s3Url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": presigned_url(storage),
            "key": OBJECT_KEY,
        })))
        .expect(1)
        .mount(issuer)
        .await;
}

fn orchestrator(issuer: &MockServer) -> UploadOrchestrator {
    UploadOrchestrator::new(issuer.uri()).with_progress_tick(Duration::from_millis(5))
}

fn selected_form(selection: FileSelection) -> UploadForm {
    let mut form = UploadForm::new();
    form.select(selection, &UploadPolicy::default())
        .expect("selection should be valid");
    form
}

#[tokio::test]
async fn test_png_upload_succeeds() {
    let issuer = MockServer::start().await;
    let storage = MockServer::start().await;
    mount_credential(&issuer, &storage).await;

    let data = vec![42u8; 2 * 1024 * 1024];
    Mock::given(method("PUT"))
        .and(path(format!("/{OBJECT_KEY}")))
        .and(header("content-type", "image/png"))
        .and(body_bytes(data.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&storage)
        .await;

    let mut form = selected_form(FileSelection::new("holiday.png", "image/png", data));

    let receipt = orchestrator(&issuer).submit(&mut form).await.unwrap();

    let expected_location = format!("{}/{OBJECT_KEY}", storage.uri());
    assert_eq!(receipt.location, expected_location);
    assert_eq!(receipt.file_name, "holiday.png");
    assert_eq!(receipt.size, 2 * 1024 * 1024);
    assert!(receipt.is_image);
    assert_eq!(
        form.state(),
        &UploadState::Succeeded {
            location: expected_location
        }
    );
    assert!(form.selection().is_none());

    form.acknowledge();
    assert_eq!(form.state(), &UploadState::Idle);
}

#[tokio::test]
async fn test_oversized_file_never_reaches_the_network() {
    let issuer = MockServer::start().await;

    let mut form = UploadForm::new();
    let result = form.select(
        FileSelection::new("scan.pdf", "application/pdf", vec![0u8; 15 * 1024 * 1024]),
        &UploadPolicy::default(),
    );

    let err = result.unwrap_err();
    assert!(matches!(err, ValidationError::TooLarge { .. }));
    assert_eq!(err.to_string(), "File size exceeds 10.0 MB limit");
    assert_eq!(form.state(), &UploadState::Idle);

    let submit = orchestrator(&issuer).submit(&mut form).await;
    assert!(matches!(submit, Err(UploadFailure::NotReady)));
    assert!(issuer.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_issuer_error_stops_before_upload() {
    let issuer = MockServer::start().await;
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s3Url"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&issuer)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&storage)
        .await;

    let mut form = selected_form(FileSelection::new(
        "contract.pdf",
        "application/pdf",
        b"%PDF-1.7".to_vec(),
    ));

    let err = orchestrator(&issuer).submit(&mut form).await.unwrap_err();

    match err {
        UploadFailure::Request(ref request_error) => {
            assert_eq!(request_error.status(), Some(500));
        }
        ref other => panic!("expected a request error, got {other:?}"),
    }
    assert_eq!(
        form.state(),
        &UploadState::Failed {
            reason: "Server error: 500".to_string()
        }
    );
    assert!(storage.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_credential_reports_upload_status() {
    let issuer = MockServer::start().await;
    let storage = MockServer::start().await;
    mount_credential(&issuer, &storage).await;

    Mock::given(method("PUT"))
        .and(path(format!("/{OBJECT_KEY}")))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&storage)
        .await;

    let mut form = selected_form(FileSelection::new(
        "cat.jpg",
        "image/jpeg",
        vec![1u8; 4096],
    ));

    let err = orchestrator(&issuer).submit(&mut form).await.unwrap_err();

    assert!(matches!(
        err,
        UploadFailure::Upload(UploadError::Status(403))
    ));
    assert_eq!(err.to_string(), "Upload failed: 403");

    // The file stays selected so the user can explicitly retry
    form.acknowledge();
    assert_eq!(form.state(), &UploadState::Selected);
}

#[tokio::test]
async fn test_each_submission_requests_its_own_credential() {
    let issuer = MockServer::start().await;
    let storage = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s3Url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": presigned_url(&storage),
        })))
        .expect(2)
        .mount(&issuer)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&storage)
        .await;

    let orchestrator = orchestrator(&issuer);
    for name in ["a.txt", "b.txt"] {
        let mut form = selected_form(FileSelection::new(name, "text/plain", b"hello".to_vec()));
        orchestrator.submit(&mut form).await.unwrap();
    }
}

#[tokio::test]
async fn test_unreachable_issuer_is_a_request_error() {
    // Nothing listens on the discard port
    let orchestrator = UploadOrchestrator::new("http://127.0.0.1:9");
    let mut form = selected_form(FileSelection::new("a.txt", "text/plain", b"hi".to_vec()));

    let err = orchestrator.submit(&mut form).await.unwrap_err();

    assert!(matches!(
        err,
        UploadFailure::Request(RequestError::Network(_))
    ));
    assert!(matches!(form.state(), UploadState::Failed { .. }));
}

#[tokio::test]
async fn test_malformed_credential_response() {
    let issuer = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s3Url"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&issuer)
        .await;

    let mut form = selected_form(FileSelection::new("a.txt", "text/plain", b"hi".to_vec()));

    let err = orchestrator(&issuer).submit(&mut form).await.unwrap_err();

    assert!(matches!(
        err,
        UploadFailure::Request(RequestError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_progress_events_bracket_the_submission() {
    let issuer = MockServer::start().await;
    let storage = MockServer::start().await;
    mount_credential(&issuer, &storage).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(50)))
        .mount(&storage)
        .await;

    let (reporter, mut events) = ChannelReporter::new();
    let orchestrator = orchestrator(&issuer).with_reporter(Arc::new(reporter));
    let mut form = selected_form(FileSelection::new("a.gif", "image/gif", vec![0u8; 64]));

    orchestrator.submit(&mut form).await.unwrap();
    drop(orchestrator);

    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }

    assert_eq!(received.first(), Some(&ProgressEvent::Started));
    assert_eq!(received.last(), Some(&ProgressEvent::Complete));
    assert!(received.iter().all(|event| match event {
        ProgressEvent::InProgress(percent) => *percent <= 90,
        _ => true,
    }));
}

#[tokio::test]
async fn test_abandoned_submission_reports_failure_and_resets() {
    let issuer = MockServer::start().await;
    let storage = MockServer::start().await;
    mount_credential(&issuer, &storage).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&storage)
        .await;

    let (reporter, mut events) = ChannelReporter::new();
    let orchestrator = orchestrator(&issuer).with_reporter(Arc::new(reporter));
    let mut form = selected_form(FileSelection::new("slow.png", "image/png", vec![3u8; 128]));

    let outcome =
        tokio::time::timeout(Duration::from_millis(200), orchestrator.submit(&mut form)).await;
    assert!(outcome.is_err());
    drop(orchestrator);

    assert_eq!(form.state(), &UploadState::Uploading);
    form.acknowledge();
    assert_eq!(form.state(), &UploadState::Selected);
    assert!(form.can_submit());

    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }
    assert_eq!(received.first(), Some(&ProgressEvent::Started));
    assert_eq!(received.last(), Some(&ProgressEvent::Failed));
    assert!(!received.contains(&ProgressEvent::Complete));
}
