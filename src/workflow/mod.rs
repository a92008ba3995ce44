//! Document summarization workflow.
//!
//! [`SummarizationWorkflow`] owns one submission cycle at a time. It submits
//! text directly, or uploads a file and polls until the summary is ready,
//! and publishes every step as a [`WorkflowState`] that the presentation
//! layer can read with [`snapshot`](SummarizationWorkflow::snapshot) or
//! follow with [`subscribe`](SummarizationWorkflow::subscribe).
//!
//! Starting a new submission, calling [`cancel`](SummarizationWorkflow::cancel)
//! or [`reset`](SummarizationWorkflow::reset) cancels the running cycle. A
//! cancelled cycle issues no further requests and never publishes state.

mod poller;
mod state;

pub use state::{Intent, WorkflowFailure, WorkflowState};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use self::poller::StatusPoller;
use crate::config::PollConfig;
use crate::errors::{SummarizerError, SummarizerResult};
use crate::observability::WorkflowMetrics;
use crate::services::{DocumentsService, FeedbackService, SummarizationService};
use crate::types::documents::{
    DocumentFile, DocumentStatus, SourceKind, SubmissionPayload, SubmissionResult,
    SummarizationRequest,
};
use crate::types::feedback::{FeedbackAck, FeedbackRecord};
use crate::types::options::SummaryOptions;

/// Rating and comment being edited for the current summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    /// Selected rating, if any.
    pub rating: Option<u8>,
    /// Comment text.
    pub comment: String,
}

/// Identifies one submission cycle.
#[derive(Debug, Clone)]
struct Cycle {
    generation: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct CycleSlot {
    generation: u64,
    token: Option<CancellationToken>,
}

struct Inner {
    summarization: SummarizationService,
    documents: DocumentsService,
    feedback: FeedbackService,
    poll: PollConfig,
    state: watch::Sender<WorkflowState>,
    cycle: Mutex<CycleSlot>,
    options: Mutex<SummaryOptions>,
    draft: Mutex<FeedbackDraft>,
    metrics: Arc<WorkflowMetrics>,
}

/// Submission workflow with observable state.
///
/// Cloning is cheap; clones share the same state and cycle.
#[derive(Clone)]
pub struct SummarizationWorkflow {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SummarizationWorkflow {
    /// Creates a workflow in the `Idle` state with default options.
    pub fn new(
        summarization: SummarizationService,
        documents: DocumentsService,
        feedback: FeedbackService,
        poll: PollConfig,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowState::Idle);
        Self {
            inner: Arc::new(Inner {
                summarization,
                documents,
                feedback,
                poll,
                state,
                cycle: Mutex::new(CycleSlot::default()),
                options: Mutex::new(SummaryOptions::default()),
                draft: Mutex::new(FeedbackDraft::default()),
                metrics: Arc::new(WorkflowMetrics::new()),
            }),
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> WorkflowState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.inner.state.subscribe()
    }

    /// Counters for this workflow.
    pub fn metrics(&self) -> &WorkflowMetrics {
        &self.inner.metrics
    }

    /// Options used by intent-driven submissions.
    pub fn options(&self) -> SummaryOptions {
        lock(&self.inner.options).clone()
    }

    /// Replaces the options used by intent-driven submissions.
    ///
    /// Options are validated when a submission starts, not here.
    pub fn set_options(&self, options: SummaryOptions) {
        *lock(&self.inner.options) = options;
    }

    /// Current feedback draft.
    pub fn feedback_draft(&self) -> FeedbackDraft {
        lock(&self.inner.draft).clone()
    }

    /// Sets the draft rating.
    pub fn set_rating(&self, rating: u8) {
        lock(&self.inner.draft).rating = Some(rating);
    }

    /// Sets the draft comment.
    pub fn set_comment(&self, comment: impl Into<String>) {
        lock(&self.inner.draft).comment = comment.into();
    }

    /// Cancels the running cycle, if any. The last published state is kept.
    pub fn cancel(&self) {
        let mut slot = lock(&self.inner.cycle);
        if let Some(token) = slot.token.take() {
            token.cancel();
            slot.generation += 1;
            tracing::debug!(generation = slot.generation, "Submission cancelled");
        }
    }

    /// Cancels the running cycle and returns to `Idle`, clearing the result
    /// and the feedback draft.
    pub fn reset(&self) {
        {
            let mut slot = lock(&self.inner.cycle);
            if let Some(token) = slot.token.take() {
                token.cancel();
            }
            slot.generation += 1;
            self.inner.state.send_replace(WorkflowState::Idle);
        }
        *lock(&self.inner.draft) = FeedbackDraft::default();
    }

    /// Summarizes text in a single request.
    ///
    /// Invalid input moves the workflow to `Failed` without a network call.
    #[instrument(skip_all)]
    pub async fn submit_text(
        &self,
        text: impl Into<String>,
        options: SummaryOptions,
    ) -> SummarizerResult<SubmissionResult> {
        let request = SummarizationRequest::text(text, options);
        self.run_cycle(request).await
    }

    /// Uploads a file and polls until its summary is ready.
    ///
    /// Invalid input moves the workflow to `Failed` without a network call.
    /// Running out of status checks fails with
    /// [`SummarizerError::Timeout`]; the document ID stays available in the
    /// `Failed` state for a later lookup.
    #[instrument(skip(self, file, options), fields(filename = %file.filename))]
    pub async fn submit_file(
        &self,
        file: DocumentFile,
        options: SummaryOptions,
    ) -> SummarizerResult<SubmissionResult> {
        let request = SummarizationRequest::file(file, options);
        self.run_cycle(request).await
    }

    /// Sends feedback. On success the draft is cleared; on failure it is kept.
    #[instrument(skip(self, record), fields(document_id = %record.document_id))]
    pub async fn submit_feedback(&self, record: FeedbackRecord) -> SummarizerResult<FeedbackAck> {
        let ack = self.inner.feedback.submit(&record).await?;
        self.inner.metrics.record_feedback();
        *lock(&self.inner.draft) = FeedbackDraft::default();
        Ok(ack)
    }

    /// Applies a user intent.
    ///
    /// Submissions use the current options. `SubmitFeedback` rates the
    /// current `Succeeded` result with the draft.
    pub async fn dispatch(&self, intent: Intent) -> SummarizerResult<()> {
        match intent {
            Intent::SubmitText { text } => {
                self.submit_text(text, self.options()).await?;
            }
            Intent::SubmitFile { file } => {
                self.submit_file(file, self.options()).await?;
            }
            Intent::ChangeOptions(options) => self.set_options(options),
            Intent::SetRating(rating) => self.set_rating(rating),
            Intent::SetComment(comment) => self.set_comment(comment),
            Intent::SubmitFeedback => {
                let record = self.draft_record()?;
                self.submit_feedback(record).await?;
            }
            Intent::Reset => self.reset(),
        }
        Ok(())
    }

    /// Builds a feedback record from the draft and the current result.
    fn draft_record(&self) -> SummarizerResult<FeedbackRecord> {
        let result = match self.snapshot() {
            WorkflowState::Succeeded(result) => result,
            _ => return Err(SummarizerError::validation("There is no summary to rate")),
        };
        let draft = self.feedback_draft();
        let rating = draft
            .rating
            .ok_or_else(|| SummarizerError::validation("Select a rating first"))?;

        Ok(FeedbackRecord::new(
            result.document_id,
            rating,
            result.summary_text.unwrap_or_default(),
        )
        .with_comment(draft.comment))
    }

    /// Cancels the previous cycle and starts a new one.
    fn begin_cycle(&self) -> Cycle {
        let mut slot = lock(&self.inner.cycle);
        if let Some(previous) = slot.token.take() {
            previous.cancel();
            tracing::debug!(generation = slot.generation, "Superseding running submission");
        }
        slot.generation += 1;
        let token = CancellationToken::new();
        slot.token = Some(token.clone());
        Cycle {
            generation: slot.generation,
            token,
        }
    }

    /// Publishes `state` unless the cycle has been superseded or cancelled.
    fn publish(&self, cycle: &Cycle, state: WorkflowState) -> bool {
        let slot = lock(&self.inner.cycle);
        if slot.generation != cycle.generation || cycle.token.is_cancelled() {
            return false;
        }
        self.inner.state.send_replace(state);
        true
    }

    /// Releases the slot if it still belongs to `cycle`.
    fn end_cycle(&self, cycle: &Cycle) {
        let mut slot = lock(&self.inner.cycle);
        if slot.generation == cycle.generation {
            slot.token = None;
        }
    }

    async fn run_cycle(&self, request: SummarizationRequest) -> SummarizerResult<SubmissionResult> {
        let cycle = self.begin_cycle();
        let source = request.source_kind();
        self.inner.metrics.record_submission(source);

        let mut document_id = None;
        let outcome = match request.payload() {
            SubmissionPayload::Text(text) => {
                self.run_text(&cycle, text, request.options()).await
            }
            SubmissionPayload::File(file) => {
                self.run_file(&cycle, file, request.options(), &mut document_id)
                    .await
            }
        };

        let outcome = self.finish(&cycle, outcome, document_id);
        self.end_cycle(&cycle);
        outcome
    }

    async fn run_text(
        &self,
        cycle: &Cycle,
        text: &str,
        options: &SummaryOptions,
    ) -> SummarizerResult<SubmissionResult> {
        self.inner.summarization.validate(text, options)?;
        self.publish(
            cycle,
            WorkflowState::Submitting {
                source: SourceKind::Text,
            },
        );

        let response = tokio::select! {
            biased;
            () = cycle.token.cancelled() => return Err(SummarizerError::Cancelled),
            response = self.inner.summarization.summarize(text, options) => response?,
        };

        let document_id = response
            .document_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let stats = Some(response.stats).filter(|s| !s.is_empty());

        Ok(SubmissionResult {
            document_id,
            status: DocumentStatus::Completed,
            summary_text: Some(response.summary),
            stats,
        })
    }

    async fn run_file(
        &self,
        cycle: &Cycle,
        file: &DocumentFile,
        options: &SummaryOptions,
        document_id: &mut Option<String>,
    ) -> SummarizerResult<SubmissionResult> {
        self.inner.documents.validate(file, options)?;
        self.publish(
            cycle,
            WorkflowState::Submitting {
                source: SourceKind::File,
            },
        );

        let upload = tokio::select! {
            biased;
            () = cycle.token.cancelled() => return Err(SummarizerError::Cancelled),
            upload = self.inner.documents.upload(file, options) => upload?,
        };
        *document_id = Some(upload.document_id.clone());

        let max_attempts = self.inner.poll.max_attempts;
        let poller = StatusPoller::new(
            &self.inner.documents,
            &self.inner.poll,
            &self.inner.metrics,
        );
        poller
            .run(&upload.document_id, &cycle.token, |attempt| {
                self.publish(
                    cycle,
                    WorkflowState::Polling {
                        document_id: upload.document_id.clone(),
                        attempt,
                        max_attempts,
                    },
                );
            })
            .await
    }

    /// Publishes the terminal state of a cycle and records metrics.
    fn finish(
        &self,
        cycle: &Cycle,
        outcome: SummarizerResult<SubmissionResult>,
        document_id: Option<String>,
    ) -> SummarizerResult<SubmissionResult> {
        if cycle.token.is_cancelled() {
            self.inner.metrics.record_cancellation();
            return Err(SummarizerError::Cancelled);
        }

        match outcome {
            Ok(result) => {
                self.inner.metrics.record_success();
                self.publish(cycle, WorkflowState::Succeeded(result.clone()));
                Ok(result)
            }
            Err(error) => {
                match WorkflowFailure::from_error(&error, document_id) {
                    Some(failure) => {
                        tracing::warn!(kind = ?failure.kind, error = %error, "Submission failed");
                        self.inner.metrics.record_failure(failure.kind);
                        self.publish(cycle, WorkflowState::Failed(failure));
                    }
                    None => self.inner.metrics.record_cancellation(),
                }
                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for SummarizationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationWorkflow")
            .field("state", &*self.inner.state.borrow())
            .field("poll", &self.inner.poll)
            .finish()
    }
}
