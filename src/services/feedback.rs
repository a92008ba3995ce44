//! Summary feedback service.

use tracing::instrument;

use super::{path_segment, RequestExecutor};
use crate::errors::{SummarizerError, SummarizerResult};
use crate::types::feedback::{Feedback, FeedbackAck, FeedbackRecord, SummaryFeedback};

/// Submits and reads summary ratings.
pub struct FeedbackService {
    executor: RequestExecutor,
}

impl FeedbackService {
    /// Creates a new feedback service.
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Sends a rating.
    #[instrument(skip(self, record), fields(document_id = %record.document_id, rating = record.rating))]
    pub async fn submit(&self, record: &FeedbackRecord) -> SummarizerResult<FeedbackAck> {
        record.validate()?;

        let ack: FeedbackAck = self.executor.post_json("feedback", &record.payload()).await?;

        tracing::info!(
            feedback_id = ack.feedback_id.as_deref().unwrap_or("-"),
            "Feedback recorded"
        );
        Ok(ack)
    }

    /// Fetches one feedback entry.
    #[instrument(skip(self))]
    pub async fn get(&self, feedback_id: &str) -> SummarizerResult<Feedback> {
        if feedback_id.trim().is_empty() {
            return Err(SummarizerError::validation("Feedback ID is required"));
        }
        self.executor
            .get_json(&format!("feedback/{}", path_segment(feedback_id)))
            .await
    }

    /// Fetches every rating recorded for a summary.
    #[instrument(skip(self))]
    pub async fn for_summary(&self, summary_id: &str) -> SummarizerResult<SummaryFeedback> {
        if summary_id.trim().is_empty() {
            return Err(SummarizerError::validation("Summary ID is required"));
        }
        self.executor
            .get_json(&format!("feedback/summary/{}", path_segment(summary_id)))
            .await
    }
}

impl std::fmt::Debug for FeedbackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackService").finish()
    }
}
