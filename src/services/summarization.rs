//! Direct text summarization service.

use std::sync::Arc;
use tracing::instrument;

use super::{path_segment, RequestExecutor};
use crate::config::SummarizerConfig;
use crate::errors::{SummarizerError, SummarizerResult};
use crate::types::models::{ModelInfo, ModelList};
use crate::types::options::SummaryOptions;
use crate::types::summarize::{SummarizeRequest, SummarizeResponse};

/// Text summarization and model catalogue service.
pub struct SummarizationService {
    executor: RequestExecutor,
    config: Arc<SummarizerConfig>,
}

impl SummarizationService {
    /// Creates a new summarization service.
    pub fn new(executor: RequestExecutor, config: Arc<SummarizerConfig>) -> Self {
        Self { executor, config }
    }

    /// Checks text and options without touching the network.
    pub fn validate(&self, text: &str, options: &SummaryOptions) -> SummarizerResult<()> {
        let mut violations = Vec::new();

        if text.trim().is_empty() {
            violations.push("empty input".to_string());
        } else {
            let chars = text.chars().count();
            if chars > self.config.max_text_length {
                violations.push(format!(
                    "Text is {} characters long; the limit is {}",
                    chars, self.config.max_text_length
                ));
            }
        }

        violations.extend(options.violations());

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SummarizerError::violations(violations))
        }
    }

    /// Summarizes text in a single synchronous request.
    #[instrument(skip(self, text, options), fields(model = %options.model_id, chars = text.len()))]
    pub async fn summarize(
        &self,
        text: &str,
        options: &SummaryOptions,
    ) -> SummarizerResult<SummarizeResponse> {
        self.validate(text, options)?;

        let body = SummarizeRequest { text, options };
        let response: SummarizeResponse = self.executor.post_json("summarize", &body).await?;

        tracing::info!(
            summary_chars = response.summary.len(),
            document_id = response.document_id.as_deref().unwrap_or("-"),
            "Text summarized"
        );

        Ok(response)
    }

    /// Lists the available summarization models.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> SummarizerResult<ModelList> {
        self.executor.get_json("summarize/models").await
    }

    /// Fetches details of one model.
    #[instrument(skip(self))]
    pub async fn model_info(&self, model_type: &str) -> SummarizerResult<ModelInfo> {
        if model_type.trim().is_empty() {
            return Err(SummarizerError::validation("Model type is required"));
        }

        self.executor
            .get_json(&format!("summarize/models/{}/info", path_segment(model_type)))
            .await
    }
}

impl std::fmt::Debug for SummarizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NoAuth;
    use crate::mocks::MockTransport;

    fn service(max_text_length: usize) -> SummarizationService {
        let config = SummarizerConfig::builder()
            .max_text_length(max_text_length)
            .build()
            .unwrap();
        let executor =
            RequestExecutor::new(Arc::new(MockTransport::new()), Arc::new(NoAuth), Vec::new());
        SummarizationService::new(executor, Arc::new(config))
    }

    #[test]
    fn test_text_limit_is_inclusive() {
        let service = service(50_000);
        let options = SummaryOptions::default();

        assert!(service.validate(&"a".repeat(50_000), &options).is_ok());

        let err = service.validate(&"a".repeat(50_001), &options).unwrap_err();
        assert_eq!(err.violation_list().len(), 1);
        assert!(err.violation_list()[0].contains("50001 characters"));
    }

    #[test]
    fn test_text_limit_counts_characters() {
        let service = service(3);
        assert!(service.validate("äöü", &SummaryOptions::default()).is_ok());
        assert!(service.validate("äöüß", &SummaryOptions::default()).is_err());
    }
}
