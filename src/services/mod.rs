//! Service implementations for the summarization API.

mod documents;
mod feedback;
mod summarization;

pub use documents::DocumentsService;
pub use feedback::FeedbackService;
pub use summarization::SummarizationService;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::errors::{ApiErrorResponse, SummarizerError, SummarizerResult};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, MultipartRequest};

/// Shared request plumbing: headers, auth, status checking and decoding.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    custom_headers: Vec<(String, String)>,
}

impl RequestExecutor {
    /// Creates a new executor.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        custom_headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            transport,
            auth,
            custom_headers,
        }
    }

    /// Headers common to every request.
    pub(crate) fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert(
            "X-Request-ID".to_string(),
            uuid::Uuid::new_v4().to_string(),
        );
        for (name, value) in &self.custom_headers {
            headers.insert(name.clone(), value.clone());
        }
        self.auth.apply_auth(&mut headers);
        headers
    }

    /// `GET` a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SummarizerResult<T> {
        let mut request = HttpRequest::get(path);
        request.headers = self.headers();

        let response = self.transport.send(request).await?;
        Self::decode(Self::check(response)?)
    }

    /// `POST` a JSON body and decode the JSON answer.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> SummarizerResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = HttpRequest::post(path).with_body(serde_json::to_vec(body)?);
        request.headers = self.headers();
        request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());

        let response = self.transport.send(request).await?;
        Self::decode(Self::check(response)?)
    }

    /// `POST` a multipart form and decode the JSON answer.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        mut request: MultipartRequest,
    ) -> SummarizerResult<T> {
        request.headers.extend(self.headers());

        let response = self.transport.send_multipart(request).await?;
        Self::decode(Self::check(response)?)
    }

    /// `DELETE` a resource, ignoring the response body.
    pub async fn delete(&self, path: &str) -> SummarizerResult<()> {
        let mut request = HttpRequest::delete(path);
        request.headers = self.headers();

        let response = self.transport.send(request).await?;
        Self::check(response).map(|_| ())
    }

    /// Turns non-2xx responses into errors.
    fn check(response: HttpResponse) -> SummarizerResult<HttpResponse> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(Self::parse_error_response(&response))
        }
    }

    fn decode<T: DeserializeOwned>(response: HttpResponse) -> SummarizerResult<T> {
        response.json().map_err(|e| SummarizerError::Serialization {
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Parses an error response without leaking the raw body.
    fn parse_error_response(response: &HttpResponse) -> SummarizerError {
        let request_id = response.request_id();

        let message = serde_json::from_slice::<ApiErrorResponse>(&response.body)
            .map(|body| body.message().to_string())
            .unwrap_or_default();

        tracing::debug!(
            status = response.status,
            request_id = request_id.as_deref().unwrap_or("-"),
            "API returned an error status"
        );

        SummarizerError::Api {
            status_code: response.status,
            message,
            request_id,
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("auth", &self.auth.scheme())
            .finish()
    }
}

/// Percent-encodes a single path segment.
pub(crate) fn path_segment(raw: &str) -> String {
    let mut url = url::Url::parse("http://segment.invalid/").ok();
    if let Some(u) = url.as_mut() {
        if let Ok(mut segments) = u.path_segments_mut() {
            segments.push(raw);
        }
    }
    url.map(|u| u.path().trim_start_matches('/').to_string())
        .unwrap_or_else(|| raw.to_string())
}
