//! Bounded, cancellable status polling for uploaded documents.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::PollConfig;
use crate::errors::{SummarizerError, SummarizerResult};
use crate::observability::{redact, WorkflowMetrics};
use crate::services::DocumentsService;
use crate::types::documents::{DocumentStatus, SubmissionResult};

/// Polls `GET /documents/{id}` until the document completes, fails, or the
/// attempt cap is reached.
pub(crate) struct StatusPoller<'a> {
    documents: &'a DocumentsService,
    config: &'a PollConfig,
    metrics: &'a WorkflowMetrics,
}

impl<'a> StatusPoller<'a> {
    pub(crate) fn new(
        documents: &'a DocumentsService,
        config: &'a PollConfig,
        metrics: &'a WorkflowMetrics,
    ) -> Self {
        Self {
            documents,
            config,
            metrics,
        }
    }

    /// Runs the loop. `on_attempt` is called with the 1-based attempt number
    /// right before each status check is issued.
    ///
    /// The first check is immediate; later checks wait `interval`. Transient
    /// errors count as "not ready yet". Every await is raced against `token`.
    pub(crate) async fn run<F>(
        &self,
        document_id: &str,
        token: &CancellationToken,
        mut on_attempt: F,
    ) -> SummarizerResult<SubmissionResult>
    where
        F: FnMut(u32),
    {
        let started = Instant::now();
        let mut result = SubmissionResult::pending(document_id);
        let mut attempts = 0;

        while attempts < self.config.max_attempts {
            if attempts > 0 {
                tokio::select! {
                    biased;
                    () = token.cancelled() => return Err(SummarizerError::Cancelled),
                    () = tokio::time::sleep(self.config.interval) => {}
                }
            }

            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    tracing::warn!(document_id, attempts, "Polling deadline reached");
                    break;
                }
            }

            attempts += 1;
            on_attempt(attempts);

            let response = tokio::select! {
                biased;
                () = token.cancelled() => return Err(SummarizerError::Cancelled),
                response = self.documents.status(document_id) => response,
            };
            self.metrics.record_poll();

            match response {
                Ok(status) => {
                    result.apply(&status);
                    match status.status {
                        DocumentStatus::Completed => {
                            tracing::info!(document_id, attempts, "Document summarized");
                            return Ok(result);
                        }
                        DocumentStatus::Failed => {
                            return Err(SummarizerError::DocumentFailed {
                                document_id: document_id.to_string(),
                                message: status
                                    .error
                                    .unwrap_or_else(|| "no reason given".to_string()),
                            });
                        }
                        other => {
                            tracing::debug!(document_id, attempt = attempts, status = ?other, "Not ready");
                        }
                    }
                }
                Err(e) if e.is_transient_poll_error() => {
                    self.metrics.record_transient_error();
                    tracing::warn!(
                        document_id,
                        attempt = attempts,
                        error = %redact(&e.to_string()),
                        "Status check failed, will retry"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(SummarizerError::Timeout {
            document_id: document_id.to_string(),
            attempts,
        })
    }
}
