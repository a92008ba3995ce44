//! End-to-end tests against a local HTTP server.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use summarizer_client::mocks::fixtures;
use summarizer_client::{
    DocumentFile, SummarizerClient, SummarizerError, SummaryOptions, WorkflowState,
};

async fn client_for(server: &MockServer) -> SummarizerClient {
    SummarizerClient::builder()
        .base_url(format!("{}/api/v1", server.uri()))
        .api_key("test-key")
        .poll_interval(Duration::from_millis(10))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_summarize_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/summarize"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "text": "Hello world", "max_length": 150 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::summarize_response("d1", "Hi.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .workflow()
        .submit_text("Hello world", SummaryOptions::default())
        .await
        .unwrap();

    assert_eq!(result.document_id, "d1");
    assert_eq!(result.summary_text.as_deref(), Some("Hi."));
}

#[tokio::test]
async fn test_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/documents"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::upload_response("d2")))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let file = DocumentFile::new("notes.txt", "Some notes worth summarizing.");
    let response = client
        .documents()
        .upload(&file, &SummaryOptions::default())
        .await
        .unwrap();
    assert_eq!(response.document_id, "d2");

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains(r#"name="file"; filename="notes.txt""#));
    assert!(body.contains("Content-Type: text/plain"));
    assert!(body.contains(r#"name="model_id""#));
    assert!(body.contains("Some notes worth summarizing."));
}

#[tokio::test]
async fn test_file_workflow_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::upload_response("d3")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/d3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::status_response("d3", "processing")),
        )
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/d3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::completed_response("d3", "Done.")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let workflow = client.workflow();
    let result = workflow
        .submit_file(
            DocumentFile::new("notes.txt", "Some notes worth summarizing."),
            SummaryOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.summary_text.as_deref(), Some("Done."));
    assert!(matches!(workflow.snapshot(), WorkflowState::Succeeded(_)));

    let polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/v1/documents/d3")
        .count();
    assert_eq!(polls, 3);
}

#[tokio::test]
async fn test_error_detail_and_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents"))
        .and(query_param("limit", "5"))
        .respond_with(
            ResponseTemplate::new(422)
                .insert_header("x-request-id", "req-123")
                .set_body_json(json!({ "detail": "skip must be non-negative" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.documents().list(0, 5).await.unwrap_err();

    match err {
        SummarizerError::Api {
            status_code,
            message,
            request_id,
        } => {
            assert_eq!(status_code, 422);
            assert_eq!(message, "skip must be non-negative");
            assert_eq!(request_id.as_deref(), Some("req-123"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = SummarizerClient::builder()
        .base_url("http://127.0.0.1:1/api/v1")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = client.summarization().list_models().await.unwrap_err();

    assert!(matches!(err, SummarizerError::Network { .. }));
}
