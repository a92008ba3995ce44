//! Workflow counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::FailureKind;
use crate::types::documents::SourceKind;

/// Point-in-time copy of [`WorkflowMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Text submissions started.
    pub text_submissions: u64,
    /// File submissions started.
    pub file_submissions: u64,
    /// Status checks completed, successful or not.
    pub status_polls: u64,
    /// Status checks that failed transiently and were retried.
    pub transient_poll_errors: u64,
    /// Cycles that produced a summary.
    pub successes: u64,
    /// Cycles that failed validation.
    pub validation_failures: u64,
    /// Cycles that failed on the wire.
    pub transport_failures: u64,
    /// Cycles that ran out of status checks.
    pub timeouts: u64,
    /// Documents the API failed to process.
    pub processing_failures: u64,
    /// Cycles cancelled or superseded.
    pub cancellations: u64,
    /// Feedback entries accepted by the API.
    pub feedback_sent: u64,
}

impl MetricsSnapshot {
    /// Submissions started, of either kind.
    pub fn submissions(&self) -> u64 {
        self.text_submissions + self.file_submissions
    }

    /// Cycles that ended in `Failed`.
    pub fn failures(&self) -> u64 {
        self.validation_failures + self.transport_failures + self.timeouts + self.processing_failures
    }

    /// Share of finished cycles that succeeded, as a percentage.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        let finished = self.successes + self.failures();
        if finished == 0 {
            100.0
        } else {
            (self.successes as f64 / finished as f64) * 100.0
        }
    }
}

/// Lock-free counters for one workflow.
#[derive(Debug, Default)]
pub struct WorkflowMetrics {
    text_submissions: AtomicU64,
    file_submissions: AtomicU64,
    status_polls: AtomicU64,
    transient_poll_errors: AtomicU64,
    successes: AtomicU64,
    validation_failures: AtomicU64,
    transport_failures: AtomicU64,
    timeouts: AtomicU64,
    processing_failures: AtomicU64,
    cancellations: AtomicU64,
    feedback_sent: AtomicU64,
}

impl WorkflowMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submission(&self, source: SourceKind) {
        let counter = match source {
            SourceKind::Text => &self.text_submissions,
            SourceKind::File => &self.file_submissions,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_poll(&self) {
        self.status_polls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transient_error(&self) {
        self.transient_poll_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, kind: FailureKind) {
        let counter = match kind {
            FailureKind::Validation => &self.validation_failures,
            FailureKind::Transport => &self.transport_failures,
            FailureKind::Timeout => &self.timeouts,
            FailureKind::Processing => &self.processing_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cancellation(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_feedback(&self) {
        self.feedback_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            text_submissions: self.text_submissions.load(Ordering::Relaxed),
            file_submissions: self.file_submissions.load(Ordering::Relaxed),
            status_polls: self.status_polls.load(Ordering::Relaxed),
            transient_poll_errors: self.transient_poll_errors.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            processing_failures: self.processing_failures.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            feedback_sent: self.feedback_sent.load(Ordering::Relaxed),
        }
    }
}
