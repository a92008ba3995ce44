//! Tests for the API services.

use std::sync::Arc;

use summarizer_client::mocks::{fixtures, MockResponse, MockTransport};
use summarizer_client::transport::HttpMethod;
use summarizer_client::{
    DocumentFile, FeedbackRecord, SummarizerClient, SummarizerError, SummaryFormat,
    SummaryOptions,
};

fn client() -> (SummarizerClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = SummarizerClient::builder()
        .base_url("https://summaries.test/api/v1")
        .api_key("test-key")
        .header("X-Tenant", "acme")
        .transport(transport.clone())
        .build()
        .unwrap();
    (client, transport)
}

#[tokio::test]
async fn test_requests_carry_auth_and_custom_headers() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::model_list());

    client.summarization().list_models().await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(
        request.headers.get("Authorization").map(String::as_str),
        Some("Bearer test-key")
    );
    assert_eq!(request.headers.get("X-Tenant").map(String::as_str), Some("acme"));
    assert!(request.headers.contains_key("X-Request-ID"));
}

#[tokio::test]
async fn test_summarize_parses_stats() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::summarize_response("d1", "Hi."));

    let response = client
        .summarization()
        .summarize("Hello world", &SummaryOptions::default())
        .await
        .unwrap();

    assert_eq!(response.summary, "Hi.");
    assert_eq!(response.document_id.as_deref(), Some("d1"));
    assert_eq!(response.stats.compression_ratio, Some(0.73));
    assert_eq!(response.stats.summary_type.as_deref(), Some("abstractive"));
}

#[tokio::test]
async fn test_text_over_limit_rejected() {
    let transport = Arc::new(MockTransport::new());
    let client = SummarizerClient::builder()
        .transport(transport.clone())
        .build()
        .unwrap();

    let text = "a".repeat(50_001);
    let err = client
        .summarization()
        .summarize(&text, &SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizerError::Validation { .. }));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_list_models() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::model_list());

    let models = client.summarization().list_models().await.unwrap();

    assert_eq!(models.models.len(), 2);
    assert!(models.find("gpt-3.5-turbo").unwrap().is_active());
    assert!(!models.find("extractive").unwrap().is_active());
    assert_eq!(transport.requests()[0].path, "summarize/models");
}

#[tokio::test]
async fn test_unknown_model_is_404() {
    let (client, transport) = client();
    transport.queue_error(404, "Model type 'nope' not found");

    let err = client.summarization().model_info("nope").await.unwrap_err();

    match err {
        SummarizerError::Api {
            status_code,
            message,
            ..
        } => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "Model type 'nope' not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.requests()[0].path, "summarize/models/nope/info");
}

#[tokio::test]
async fn test_upload_sends_file_and_options() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::upload_response("d2"));

    let options = SummaryOptions::builder()
        .format(SummaryFormat::Bullets)
        .include_keywords(true)
        .language("de")
        .build()
        .unwrap();
    let file = DocumentFile::new("report.pdf", vec![1u8; 2048]).with_content_type("application/pdf");

    let response = client.documents().upload(&file, &options).await.unwrap();

    assert_eq!(response.document_id, "d2");
    assert!(response.upload_timestamp.is_some());

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "documents");
    assert_eq!(request.files, vec!["report.pdf".to_string()]);
    assert_eq!(request.form_fields["format"], "bullets");
    assert_eq!(request.form_fields["include_keywords"], "true");
    assert_eq!(request.form_fields["language"], "de");
    assert_eq!(request.form_fields["max_length"], "150");
}

#[tokio::test]
async fn test_upload_error_detail_surfaces() {
    let (client, transport) = client();
    transport.queue_error(400, "File size exceeds 10MB limit");

    let file = DocumentFile::new("notes.txt", "hello");
    let err = client
        .documents()
        .upload(&file, &SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SummarizerError::Api { status_code: 400, ref message, .. } if message == "File size exceeds 10MB limit"
    ));
}

#[tokio::test]
async fn test_status_encodes_document_id() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::status_response("a b", "pending"));

    client.documents().status("a b").await.unwrap();

    assert_eq!(transport.requests()[0].path, "documents/a%20b");
}

#[tokio::test]
async fn test_undecodable_status_is_serialization_error() {
    let (client, transport) = client();
    transport.queue(MockResponse::json(&"not an object"));

    let err = client.documents().status("d1").await.unwrap_err();

    assert!(matches!(err, SummarizerError::Serialization { .. }));
    assert!(err.is_transient_poll_error());
}

#[tokio::test]
async fn test_summarize_uploaded_document() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::summarize_response("d7", "Short version."));

    let options = SummaryOptions::builder().model("extractive").build().unwrap();
    let response = client.documents().summarize("d7", &options).await.unwrap();

    assert_eq!(response.summary, "Short version.");
    assert_eq!(response.document_id.as_deref(), Some("d7"));
    assert_eq!(response.stats.compression_ratio, Some(0.73));

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, "documents/d7/summarize?summary_type=extractive");
    assert_eq!(request.json().unwrap()["model_id"], "extractive");
}

#[tokio::test]
async fn test_summarize_unknown_document() {
    let (client, transport) = client();
    transport.queue_error(404, "Document with ID 'gone' not found");

    let err = client
        .documents()
        .summarize("gone", &SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizerError::Api { status_code: 404, .. }));
}

#[tokio::test]
async fn test_summarize_document_requires_id() {
    let (client, transport) = client();

    let err = client
        .documents()
        .summarize("  ", &SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizerError::Validation { .. }));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_list_documents() {
    let (client, transport) = client();
    transport.queue_json(&serde_json::json!({
        "documents": [{
            "document_id": "d1",
            "filename": "notes.txt",
            "content_type": "text/plain",
            "size": 42,
            "upload_timestamp": "2024-05-01T12:00:00",
            "summary_count": 2
        }],
        "total_count": 1
    }));

    let page = client.documents().list(0, 10).await.unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.documents[0].summary_count, 2);
    assert_eq!(transport.requests()[0].path, "documents?skip=0&limit=10");
}

#[tokio::test]
async fn test_list_rejects_bad_page_size() {
    let (client, transport) = client();

    assert!(client.documents().list(0, 0).await.is_err());
    assert!(client.documents().list(0, 1001).await.is_err());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_delete_document() {
    let (client, transport) = client();
    transport.queue(MockResponse::json(&serde_json::json!({"message": "deleted"})));

    client.documents().delete("d1").await.unwrap();

    assert_eq!(transport.requests_for(HttpMethod::Delete, "documents/d1").len(), 1);
}

#[tokio::test]
async fn test_delete_missing_document() {
    let (client, transport) = client();
    transport.queue_error(404, "Document not found");

    let err = client.documents().delete("gone").await.unwrap_err();
    assert!(matches!(err, SummarizerError::Api { status_code: 404, .. }));
}

#[tokio::test]
async fn test_feedback_submit_and_read_back() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::feedback_ack("f1", "d1"));
    transport.queue_json(&serde_json::json!({
        "summary_id": "d1",
        "feedback": [
            { "feedback_id": "f1", "rating": 5, "feedback_type": "positive" }
        ]
    }));

    let record = FeedbackRecord::new("d1", 3, "Hi.").with_comment("Missed the point");
    let ack = client.feedback().submit(&record).await.unwrap();
    assert_eq!(ack.feedback_id.as_deref(), Some("f1"));

    let body = transport.requests()[0].json().unwrap();
    assert_eq!(body["feedback_type"], "negative");

    let all = client.feedback().for_summary("d1").await.unwrap();
    assert_eq!(all.feedback.len(), 1);
    assert_eq!(transport.requests()[1].path, "feedback/summary/d1");
}

#[tokio::test]
async fn test_feedback_get_path() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::feedback_ack("f9", "d1"));

    let feedback = client.feedback().get("f9").await.unwrap();

    assert_eq!(feedback.summary_id.as_deref(), Some("d1"));
    assert_eq!(transport.requests()[0].path, "feedback/f9");
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let (client, transport) = client();
    transport.queue_failure("connection refused");

    let err = client.summarization().list_models().await.unwrap_err();

    assert!(matches!(err, SummarizerError::Network { .. }));
    assert!(err.user_message().contains("Could not reach"));
}
