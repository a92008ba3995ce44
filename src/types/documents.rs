//! Document upload, status and listing types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::common::{deserialize_timestamp, SummaryStats};
use super::options::SummaryOptions;
use crate::config::SummarizerConfig;
use crate::errors::SummarizerError;

/// A file selected for upload.
#[derive(Clone)]
pub struct DocumentFile {
    /// Original file name, including its extension.
    pub filename: String,
    /// MIME type declared by the source of the file, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

impl DocumentFile {
    /// Creates a file from in-memory bytes.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Reads a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SummarizerError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            SummarizerError::validation(format!("Could not read {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(filename, data))
    }

    /// Sets the declared MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lowercase extension without the dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// MIME type sent with the upload: the declared one, else a guess from the extension.
    pub fn effective_content_type(&self) -> String {
        self.content_type
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| {
                content_type_for_extension(self.extension().as_deref().unwrap_or("")).to_string()
            })
    }

    /// Returns every upload constraint this file violates.
    ///
    /// Size, emptiness, extension and declared MIME type are all checked so
    /// the caller can report them together.
    pub fn violations(&self, config: &SummarizerConfig) -> Vec<String> {
        let mut violations = Vec::new();

        if self.data.is_empty() {
            violations.push(format!("File \"{}\" is empty", self.filename));
        } else if self.size() > config.max_file_size {
            violations.push(format!(
                "File size {} exceeds the {} limit",
                format_size(self.size()),
                format_size(config.max_file_size)
            ));
        }

        let allowed = config
            .allowed_extensions
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(", ");

        match self.extension() {
            Some(ext) if config.is_extension_allowed(&ext) => {}
            Some(ext) => violations.push(format!(
                "File type \".{ext}\" is not supported (allowed: {allowed})"
            )),
            None => violations.push(format!(
                "File \"{}\" has no extension (allowed: {allowed})",
                self.filename
            )),
        }

        if let Some(declared) = self.content_type.as_deref().filter(|c| !c.trim().is_empty()) {
            match declared.parse::<mime::Mime>() {
                Ok(parsed) => {
                    let essence = parsed.essence_str();
                    let accepted = essence == mime::APPLICATION_OCTET_STREAM.essence_str()
                        || config
                            .allowed_extensions
                            .iter()
                            .any(|ext| content_type_for_extension(ext) == essence);
                    if !accepted {
                        violations.push(format!("Content type \"{essence}\" is not supported"));
                    }
                }
                Err(_) => violations.push(format!(
                    "Content type \"{declared}\" is not a valid MIME type"
                )),
            }
        }

        violations
    }

    /// Validates the file against the configured upload limits.
    pub fn validate(&self, config: &SummarizerConfig) -> Result<(), SummarizerError> {
        let violations = self.violations(config);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SummarizerError::violations(violations))
        }
    }
}

impl std::fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// MIME type conventionally used for a document extension.
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "rtf" => "application/rtf",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}

/// Human-readable byte size (`"15.0 MB"`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Whether the submission carried pasted text or an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Directly submitted text.
    Text,
    /// Uploaded document.
    File,
}

/// Content of a submission.
#[derive(Debug, Clone)]
pub enum SubmissionPayload {
    /// Pasted text.
    Text(String),
    /// Uploaded document.
    File(DocumentFile),
}

/// A submission as it was sent; never modified afterwards.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    payload: SubmissionPayload,
    options: SummaryOptions,
}

impl SummarizationRequest {
    /// Creates a text submission.
    pub fn text(text: impl Into<String>, options: SummaryOptions) -> Self {
        Self {
            payload: SubmissionPayload::Text(text.into()),
            options,
        }
    }

    /// Creates a file submission.
    pub fn file(file: DocumentFile, options: SummaryOptions) -> Self {
        Self {
            payload: SubmissionPayload::File(file),
            options,
        }
    }

    /// Returns the source kind.
    pub fn source_kind(&self) -> SourceKind {
        match self.payload {
            SubmissionPayload::Text(_) => SourceKind::Text,
            SubmissionPayload::File(_) => SourceKind::File,
        }
    }

    /// Returns the payload.
    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    /// Returns the options.
    pub fn options(&self) -> &SummaryOptions {
        &self.options
    }
}

/// Processing status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DocumentStatus {
    /// Accepted, not started.
    #[default]
    Pending,
    /// Being summarized.
    Processing,
    /// Summary available.
    Completed,
    /// The API gave up on the document.
    Failed,
    /// A status this client does not know; treated as not ready.
    Unknown,
}

impl From<String> for DocumentStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" => Self::Pending,
            "processing" | "in_progress" => Self::Processing,
            "completed" | "complete" | "done" => Self::Completed,
            "failed" | "error" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl DocumentStatus {
    /// Returns true if polling should stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    /// Document the summary belongs to.
    pub document_id: String,
    /// Processing status.
    pub status: DocumentStatus,
    /// Summary text once available.
    pub summary_text: Option<String>,
    /// Statistics reported by the API.
    pub stats: Option<SummaryStats>,
}

impl SubmissionResult {
    /// Creates a completed result.
    pub fn completed(document_id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            status: DocumentStatus::Completed,
            summary_text: Some(summary.into()),
            stats: None,
        }
    }

    /// Creates a result for a freshly uploaded document.
    pub fn pending(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            status: DocumentStatus::Pending,
            summary_text: None,
            stats: None,
        }
    }

    /// Applies a status poll response.
    pub fn apply(&mut self, status: &DocumentStatusResponse) {
        self.status = status.status;
        if status.summary.is_some() {
            self.summary_text.clone_from(&status.summary);
        }
        if let Some(stats) = status.stats.as_ref().filter(|s| !s.is_empty()) {
            self.stats = Some(stats.clone());
        }
    }
}

/// Response to `POST /documents`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadResponse {
    /// ID assigned to the document.
    pub document_id: String,

    /// Stored file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Stored content type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Upload time.
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_timestamp: Option<DateTime<Utc>>,
}

/// Response to `GET /documents/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentStatusResponse {
    /// Document ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    /// Processing status.
    #[serde(default)]
    pub status: DocumentStatus,

    /// Summary, once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Failure reason, when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Summary statistics.
    #[serde(flatten)]
    pub stats: Option<SummaryStats>,
}

/// Entry of `GET /documents`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentListItem {
    /// Document ID.
    pub document_id: String,
    /// Original file name.
    pub filename: String,
    /// Content type.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Upload time.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub upload_timestamp: Option<DateTime<Utc>>,
    /// Number of summaries generated for this document.
    #[serde(default)]
    pub summary_count: u32,
}

/// Response to `GET /documents`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentListResponse {
    /// The requested page.
    pub documents: Vec<DocumentListItem>,
    /// Total number of stored documents.
    pub total_count: u64,
}
