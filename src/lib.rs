//! Summarizer Client Library
//!
//! An async Rust client for a text-summarization API, built around a
//! submission workflow with observable state. Text is summarized in one
//! request; uploaded documents are processed asynchronously and polled
//! until their summary is ready.
//!
//! # Features
//!
//! - **Workflow**: `Idle → Submitting → Polling → Succeeded | Failed`, published over a `watch` channel
//! - **Bounded polling**: fixed attempt cap and interval, cancellable at every suspension point
//! - **Validation**: every violated constraint reported at once, before any request is sent
//! - **Feedback**: star ratings with a draft that survives failed submissions
//! - **Observability**: `tracing` spans, subscriber setup, workflow counters
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use summarizer_client::{DocumentFile, SummarizerClient, SummaryOptions, WorkflowState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SummarizerClient::builder()
//!         .base_url("https://summaries.example.com/api/v1")
//!         .build()?;
//!
//!     let workflow = client.workflow();
//!     let mut states = workflow.subscribe();
//!     tokio::spawn(async move {
//!         while states.changed().await.is_ok() {
//!             if let WorkflowState::Polling { attempt, max_attempts, .. } = &*states.borrow() {
//!                 println!("checking {attempt}/{max_attempts}");
//!             }
//!         }
//!     });
//!
//!     let file = DocumentFile::from_path("report.pdf").await?;
//!     let result = workflow.submit_file(file, SummaryOptions::default()).await?;
//!     println!("{}", result.summary_text.unwrap_or_default());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;
pub mod workflow;

pub mod mocks;

// Re-exports for convenience
pub use client::{SummarizerClient, SummarizerClientBuilder};
pub use config::{PollConfig, SummarizerConfig};
pub use errors::{FailureKind, SummarizerError, SummarizerResult};
pub use workflow::{FeedbackDraft, Intent, SummarizationWorkflow, WorkflowFailure, WorkflowState};

// Type re-exports
pub use types::common::SummaryStats;
pub use types::documents::{
    DocumentFile, DocumentListItem, DocumentListResponse, DocumentStatus,
    DocumentStatusResponse, SourceKind, SubmissionResult, SummarizationRequest, UploadResponse,
};
pub use types::feedback::{Feedback, FeedbackAck, FeedbackRecord, FeedbackType, SummaryFeedback};
pub use types::models::{ModelInfo, ModelList};
pub use types::options::{SummaryFormat, SummaryOptions};
pub use types::summarize::SummarizeResponse;
