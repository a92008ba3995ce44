//! Document upload and status service.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use super::{path_segment, RequestExecutor};
use crate::config::SummarizerConfig;
use crate::errors::{SummarizerError, SummarizerResult};
use crate::transport::{MultipartPart, MultipartRequest};
use crate::types::documents::{
    DocumentFile, DocumentListResponse, DocumentStatusResponse, UploadResponse,
};
use crate::types::options::SummaryOptions;
use crate::types::summarize::SummarizeResponse;

/// Largest page accepted by `GET /documents`.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Document upload, status, on-demand summaries, listing and deletion.
pub struct DocumentsService {
    executor: RequestExecutor,
    config: Arc<SummarizerConfig>,
}

impl DocumentsService {
    /// Creates a new documents service.
    pub fn new(executor: RequestExecutor, config: Arc<SummarizerConfig>) -> Self {
        Self { executor, config }
    }

    /// Checks the file and options without touching the network.
    pub fn validate(&self, file: &DocumentFile, options: &SummaryOptions) -> SummarizerResult<()> {
        let mut violations = file.violations(&self.config);
        violations.extend(options.violations());

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SummarizerError::violations(violations))
        }
    }

    /// Uploads a document for asynchronous summarization.
    #[instrument(skip(self, file, options), fields(filename = %file.filename, size = file.size()))]
    pub async fn upload(
        &self,
        file: &DocumentFile,
        options: &SummaryOptions,
    ) -> SummarizerResult<UploadResponse> {
        self.validate(file, options)?;

        let request = self.build_upload_request(file, options);
        let response: UploadResponse = self.executor.post_multipart(request).await?;

        tracing::info!(document_id = %response.document_id, "Document uploaded");
        Ok(response)
    }

    /// Queries the processing status of a document.
    #[instrument(skip(self))]
    pub async fn status(&self, document_id: &str) -> SummarizerResult<DocumentStatusResponse> {
        Self::require_id(document_id)?;
        self.executor
            .get_json(&format!("documents/{}", path_segment(document_id)))
            .await
    }

    /// Lists uploaded documents, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, skip: u32, limit: u32) -> SummarizerResult<DocumentListResponse> {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(SummarizerError::validation(format!(
                "Page size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, limit
            )));
        }

        self.executor
            .get_json(&format!("documents?skip={skip}&limit={limit}"))
            .await
    }

    /// Summarizes an already uploaded document on demand.
    ///
    /// The model is passed as the `summary_type` query parameter and the
    /// options travel as the JSON body.
    #[instrument(skip(self, options), fields(model = %options.model_id))]
    pub async fn summarize(
        &self,
        document_id: &str,
        options: &SummaryOptions,
    ) -> SummarizerResult<SummarizeResponse> {
        Self::require_id(document_id)?;
        let violations = options.violations();
        if !violations.is_empty() {
            return Err(SummarizerError::violations(violations));
        }

        let path = format!(
            "documents/{}/summarize?summary_type={}",
            path_segment(document_id),
            path_segment(&options.model_id)
        );
        let response: SummarizeResponse = self.executor.post_json(&path, options).await?;

        tracing::info!(document_id, summary_chars = response.summary.len(), "Document summarized");
        Ok(response)
    }

    /// Deletes a document.
    #[instrument(skip(self))]
    pub async fn delete(&self, document_id: &str) -> SummarizerResult<()> {
        Self::require_id(document_id)?;
        self.executor
            .delete(&format!("documents/{}", path_segment(document_id)))
            .await?;

        tracing::info!(document_id, "Document deleted");
        Ok(())
    }

    fn require_id(document_id: &str) -> SummarizerResult<()> {
        if document_id.trim().is_empty() {
            Err(SummarizerError::validation("Document ID is required"))
        } else {
            Ok(())
        }
    }

    /// Builds the multipart form: the file plus one text field per option.
    fn build_upload_request(&self, file: &DocumentFile, options: &SummaryOptions) -> MultipartRequest {
        let mut parts = vec![MultipartPart::File {
            name: "file".to_string(),
            filename: file.filename.clone(),
            content_type: file.effective_content_type(),
            data: file.data.clone(),
        }];

        parts.extend(
            options
                .form_fields()
                .into_iter()
                .map(|(name, value)| MultipartPart::Text {
                    name: name.to_string(),
                    value,
                }),
        );

        MultipartRequest {
            path: "documents".to_string(),
            headers: HashMap::new(),
            parts,
            timeout: None,
        }
    }
}

impl std::fmt::Debug for DocumentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentsService").finish()
    }
}
