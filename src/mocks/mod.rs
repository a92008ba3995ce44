//! Mock implementations for testing.
//!
//! [`MockTransport`] replays queued responses in order and records every
//! request, so workflows can be driven without a server.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest,
    TransportError,
};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request body (JSON requests only).
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Multipart text fields.
    pub form_fields: HashMap<String, String>,
    /// Multipart file names.
    pub files: Vec<String>,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
    /// Simulated latency.
    pub delay: Option<Duration>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
            delay: None,
        }
    }

    /// Creates an error response shaped like the API's `{"detail": ...}` body.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(&serde_json::json!({ "detail": message })).with_status(status)
    }

    /// Sets the status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Delays the response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Response(MockResponse),
    ConnectionFailure(String),
}

/// Mock HTTP transport for testing.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.replies).push_back(MockReply::Response(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Queues a connection failure.
    pub fn queue_failure(&self, message: &str) {
        lock(&self.replies).push_back(MockReply::ConnectionFailure(message.to_string()));
    }

    /// Sets the response used once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Requests with the given method and exact path.
    pub fn requests_for(&self, method: HttpMethod, path: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn next_reply(&self) -> MockReply {
        if let Some(reply) = lock(&self.replies).pop_front() {
            return reply;
        }
        MockReply::Response(
            lock(&self.default_response)
                .clone()
                .unwrap_or_else(|| MockResponse::error(500, "No mock response configured")),
        )
    }

    async fn respond(&self) -> Result<HttpResponse, TransportError> {
        match self.next_reply() {
            MockReply::Response(response) => {
                if let Some(delay) = response.delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse {
                    status: response.status,
                    headers: response.headers,
                    body: response.body,
                })
            }
            MockReply::ConnectionFailure(message) => Err(TransportError::Connection { message }),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            path: request.path,
            body: request.body,
            headers: request.headers,
            form_fields: HashMap::new(),
            files: Vec::new(),
        });
        self.respond().await
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        let mut form_fields = HashMap::new();
        let mut files = Vec::new();
        for part in request.parts {
            match part {
                MultipartPart::Text { name, value } => {
                    form_fields.insert(name, value);
                }
                MultipartPart::File { filename, .. } => files.push(filename),
            }
        }

        lock(&self.requests).push(RecordedRequest {
            method: HttpMethod::Post,
            path: request.path,
            body: None,
            headers: request.headers,
            form_fields,
            files,
        });
        self.respond().await
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Canned API bodies.
pub mod fixtures {
    use serde_json::{json, Value};

    /// `POST /summarize` success.
    pub fn summarize_response(document_id: &str, summary: &str) -> Value {
        json!({
            "summary": summary,
            "document_id": document_id,
            "original_length": 11,
            "summary_length": summary.len(),
            "compression_ratio": 0.73,
            "summary_type": "abstractive"
        })
    }

    /// `POST /documents` success.
    pub fn upload_response(document_id: &str) -> Value {
        json!({
            "document_id": document_id,
            "filename": "upload.txt",
            "content_type": "text/plain",
            "size": 1024,
            "upload_timestamp": "2024-05-01T12:00:00.123456"
        })
    }

    /// `GET /documents/{id}` with a status and no summary.
    pub fn status_response(document_id: &str, status: &str) -> Value {
        json!({ "document_id": document_id, "status": status })
    }

    /// `GET /documents/{id}` for a finished document.
    pub fn completed_response(document_id: &str, summary: &str) -> Value {
        json!({
            "document_id": document_id,
            "status": "completed",
            "summary": summary,
            "compression_ratio": 0.5
        })
    }

    /// `GET /documents/{id}` for a document the API gave up on.
    pub fn failed_response(document_id: &str, reason: &str) -> Value {
        json!({ "document_id": document_id, "status": "failed", "error": reason })
    }

    /// `POST /feedback` acknowledgement.
    pub fn feedback_ack(feedback_id: &str, summary_id: &str) -> Value {
        json!({
            "feedback_id": feedback_id,
            "summary_id": summary_id,
            "feedback_type": "positive",
            "timestamp": "2024-05-01T12:00:00",
            "message": "Feedback submitted successfully"
        })
    }

    /// `GET /summarize/models`.
    pub fn model_list() -> Value {
        json!({
            "models": [
                {
                    "name": "GPT-3.5 Turbo",
                    "description": "Fast general-purpose model",
                    "type": "gpt-3.5-turbo",
                    "version": "1.0",
                    "status": "active"
                },
                {
                    "name": "Extractive",
                    "description": "Sentence ranking",
                    "type": "extractive",
                    "version": "0.9",
                    "status": "deprecated"
                }
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_order_and_default() {
        let transport = MockTransport::new();
        transport.queue_json(&serde_json::json!({"n": 1}));
        transport.queue_failure("reset");
        transport.set_default(MockResponse::json(&serde_json::json!({"n": 0})));

        let first = transport.send(HttpRequest::get("a")).await.unwrap();
        assert_eq!(first.status, 200);
        assert!(transport.send(HttpRequest::get("b")).await.is_err());
        let fallback = transport.send(HttpRequest::get("c")).await.unwrap();
        assert_eq!(fallback.body, br#"{"n":0}"#.to_vec());

        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.requests_for(HttpMethod::Get, "b").len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_returns_500() {
        let transport = MockTransport::new();
        let response = transport.send(HttpRequest::get("x")).await.unwrap();
        assert_eq!(response.status, 500);
    }
}
