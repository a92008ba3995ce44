//! Direct text summarization types.

use serde::{Deserialize, Serialize};

use super::common::SummaryStats;
use super::options::SummaryOptions;

/// Body of `POST /summarize`.
#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest<'a> {
    /// Text to summarize.
    pub text: &'a str,
    /// Summary options.
    #[serde(flatten)]
    pub options: &'a SummaryOptions,
}

/// Response to `POST /summarize`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarizeResponse {
    /// The generated summary.
    pub summary: String,

    /// Document ID assigned by the API, when it stores the submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    /// Extracted keywords, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    /// Summary statistics.
    #[serde(flatten)]
    pub stats: SummaryStats,
}
