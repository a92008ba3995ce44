//! Summary rating types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::deserialize_timestamp;
use crate::errors::SummarizerError;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Ratings at or above this count as positive feedback.
pub const POSITIVE_RATING_THRESHOLD: u8 = 4;

/// A user's rating of a summary. Sent once and not kept afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// The rated document.
    pub document_id: String,
    /// Star rating (1-5).
    pub rating: u8,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// The summary as the user saw it.
    pub summary_snapshot: String,
}

impl FeedbackRecord {
    /// Creates a feedback record without a comment.
    pub fn new(document_id: impl Into<String>, rating: u8, summary: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            rating,
            comment: None,
            summary_snapshot: summary.into(),
        }
    }

    /// Attaches a comment; blank comments are dropped.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = if comment.trim().is_empty() {
            None
        } else {
            Some(comment)
        };
        self
    }

    /// Positive or negative, derived from the rating.
    pub fn feedback_type(&self) -> FeedbackType {
        if self.rating >= POSITIVE_RATING_THRESHOLD {
            FeedbackType::Positive
        } else {
            FeedbackType::Negative
        }
    }

    /// Validates the record.
    pub fn validate(&self) -> Result<(), SummarizerError> {
        let mut violations = Vec::new();

        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            violations.push(format!(
                "Rating must be between {} and {} (got {})",
                MIN_RATING, MAX_RATING, self.rating
            ));
        }

        if self.document_id.trim().is_empty() {
            violations.push("Feedback must reference a document".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SummarizerError::violations(violations))
        }
    }

    /// Builds the request body.
    pub fn payload(&self) -> FeedbackPayload<'_> {
        FeedbackPayload {
            document_id: &self.document_id,
            summary_id: &self.document_id,
            rating: self.rating,
            feedback_type: self.feedback_type(),
            comments: self.comment.as_deref().unwrap_or_default(),
            summary: &self.summary_snapshot,
        }
    }
}

/// Coarse sentiment of a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    /// Rating at or above the positive threshold.
    Positive,
    /// Rating below the positive threshold.
    Negative,
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPayload<'a> {
    /// The rated document.
    pub document_id: &'a str,
    /// The rated summary; summaries are identified by their document.
    pub summary_id: &'a str,
    /// Star rating.
    pub rating: u8,
    /// Derived sentiment.
    pub feedback_type: FeedbackType,
    /// Comment, empty when none was given.
    pub comments: &'a str,
    /// The summary as the user saw it.
    pub summary: &'a str,
}

/// Stored feedback, as acknowledged or returned by the API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Feedback {
    /// Feedback ID.
    #[serde(default)]
    pub feedback_id: Option<String>,
    /// The rated summary.
    #[serde(default)]
    pub summary_id: Option<String>,
    /// Star rating.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Sentiment.
    #[serde(default)]
    pub feedback_type: Option<FeedbackType>,
    /// Comment.
    #[serde(default)]
    pub comments: Option<String>,
    /// Submission time.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Confirmation message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Acknowledgement returned by `POST /feedback`.
pub type FeedbackAck = Feedback;

/// Response to `GET /feedback/summary/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryFeedback {
    /// The summary the feedback belongs to.
    pub summary_id: String,
    /// All feedback recorded for it.
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}
