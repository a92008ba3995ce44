//! Observable workflow state and user intents.

use crate::errors::{FailureKind, SummarizerError};
use crate::types::documents::{DocumentFile, SourceKind, SubmissionResult};
use crate::types::options::SummaryOptions;

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    /// Nothing submitted yet, or reset.
    #[default]
    Idle,
    /// The initial request is in flight.
    Submitting {
        /// Text or file.
        source: SourceKind,
    },
    /// Waiting for an uploaded document to finish processing.
    Polling {
        /// The uploaded document.
        document_id: String,
        /// 1-based number of the status check in flight.
        attempt: u32,
        /// Status checks allowed in total.
        max_attempts: u32,
    },
    /// A summary is available.
    Succeeded(SubmissionResult),
    /// The cycle ended with an error.
    Failed(WorkflowFailure),
}

impl WorkflowState {
    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    /// Returns true while a submission cycle is running.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting { .. } | Self::Polling { .. })
    }

    /// Document the state refers to, when one is known.
    pub fn document_id(&self) -> Option<&str> {
        match self {
            Self::Polling { document_id, .. } => Some(document_id),
            Self::Succeeded(result) => Some(&result.document_id),
            Self::Failed(failure) => failure.document_id.as_deref(),
            Self::Idle | Self::Submitting { .. } => None,
        }
    }

    /// The summary result, if the last cycle succeeded.
    pub fn result(&self) -> Option<&SubmissionResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Terminal failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFailure {
    /// Failure classification.
    pub kind: FailureKind,
    /// Single human-readable message.
    pub message: String,
    /// Document ID, when the upload got that far.
    pub document_id: Option<String>,
}

impl WorkflowFailure {
    /// Builds a failure from an error. Returns `None` for cancellation.
    pub fn from_error(error: &SummarizerError, document_id: Option<String>) -> Option<Self> {
        let kind = error.kind()?;
        Some(Self {
            kind,
            message: error.user_message(),
            document_id: error
                .document_id()
                .map(str::to_string)
                .or(document_id),
        })
    }
}

/// User actions forwarded by the presentation layer.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Summarize pasted text with the current options.
    SubmitText {
        /// The text.
        text: String,
    },
    /// Upload a file with the current options.
    SubmitFile {
        /// The file.
        file: DocumentFile,
    },
    /// Replace the current options.
    ChangeOptions(SummaryOptions),
    /// Set the draft rating.
    SetRating(u8),
    /// Set the draft comment.
    SetComment(String),
    /// Send the draft feedback for the current summary.
    SubmitFeedback,
    /// Cancel anything in flight and return to `Idle`.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_timeout_failure_keeps_document_id() {
        let err = SummarizerError::Timeout {
            document_id: "d3".to_string(),
            attempts: 30,
        };
        let failure = WorkflowFailure::from_error(&err, None).unwrap();

        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.document_id.as_deref(), Some("d3"));
        assert!(failure.message.contains("d3"));
    }

    #[test]
    fn test_transport_failure_uses_known_document() {
        let err = SummarizerError::api(401, "Invalid token");
        let failure = WorkflowFailure::from_error(&err, Some("d4".to_string())).unwrap();

        assert_eq!(failure.kind, FailureKind::Transport);
        assert_eq!(failure.document_id.as_deref(), Some("d4"));
    }

    #[test]
    fn test_cancellation_has_no_failure() {
        assert!(WorkflowFailure::from_error(&SummarizerError::Cancelled, None).is_none());
    }

    #[test]
    fn test_state_accessors() {
        let polling = WorkflowState::Polling {
            document_id: "d1".to_string(),
            attempt: 2,
            max_attempts: 30,
        };
        assert!(polling.is_busy());
        assert!(!polling.is_terminal());
        assert_eq!(polling.document_id(), Some("d1"));

        let done = WorkflowState::Succeeded(SubmissionResult::completed("d1", "Hi."));
        assert!(done.is_terminal());
        assert_eq!(done.result().unwrap().summary_text.as_deref(), Some("Hi."));
        assert_eq!(WorkflowState::default(), WorkflowState::Idle);
    }
}
