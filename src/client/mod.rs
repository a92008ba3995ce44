//! Summarizer API client.
//!
//! Wires configuration, transport and authentication into the services and
//! hands out [`SummarizationWorkflow`] instances.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ApiKeyAuth, AuthProvider, NoAuth};
use crate::config::{PollConfig, SummarizerConfig, SummarizerConfigBuilder};
use crate::errors::{SummarizerError, SummarizerResult};
use crate::services::{DocumentsService, FeedbackService, RequestExecutor, SummarizationService};
use crate::transport::{HttpTransport, HttpTransportImpl};
use crate::workflow::SummarizationWorkflow;

/// The main summarizer client.
///
/// # Example
///
/// ```rust,no_run
/// use summarizer_client::{SummarizerClient, SummaryOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SummarizerClient::builder()
///         .base_url("https://summaries.example.com/api/v1")
///         .build()?;
///
///     let workflow = client.workflow();
///     let result = workflow
///         .submit_text("Long article text...", SummaryOptions::default())
///         .await?;
///     println!("{}", result.summary_text.unwrap_or_default());
///     Ok(())
/// }
/// ```
pub struct SummarizerClient {
    config: Arc<SummarizerConfig>,
    executor: RequestExecutor,
    summarization: SummarizationService,
    documents: DocumentsService,
    feedback: FeedbackService,
}

impl SummarizerClient {
    /// Creates a new client builder.
    pub fn builder() -> SummarizerClientBuilder {
        SummarizerClientBuilder::new()
    }

    /// Creates a client from `SUMMARIZER_*` environment variables.
    pub fn from_env() -> SummarizerResult<Self> {
        let config = SummarizerConfig::from_env()?;
        SummarizerClientBuilder::from_config(&config).build()
    }

    /// Returns the text summarization service.
    pub fn summarization(&self) -> &SummarizationService {
        &self.summarization
    }

    /// Returns the documents service.
    pub fn documents(&self) -> &DocumentsService {
        &self.documents
    }

    /// Returns the feedback service.
    pub fn feedback(&self) -> &FeedbackService {
        &self.feedback
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Creates a workflow with its own state, in `Idle`.
    pub fn workflow(&self) -> SummarizationWorkflow {
        SummarizationWorkflow::new(
            SummarizationService::new(self.executor.clone(), Arc::clone(&self.config)),
            DocumentsService::new(self.executor.clone(), Arc::clone(&self.config)),
            FeedbackService::new(self.executor.clone()),
            self.config.poll.clone(),
        )
    }
}

impl std::fmt::Debug for SummarizerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the summarizer client.
#[derive(Default)]
pub struct SummarizerClientBuilder {
    config_builder: SummarizerConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl SummarizerClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: &SummarizerConfig) -> Self {
        let mut config_builder = SummarizerConfigBuilder::new()
            .base_url(&config.base_url)
            .timeout(config.timeout)
            .max_file_size(config.max_file_size)
            .allowed_extensions(config.allowed_extensions.iter().cloned())
            .max_text_length(config.max_text_length)
            .poll(config.poll.clone());

        if let Some(key) = config.api_key() {
            config_builder = config_builder.api_key(key);
        }
        for (name, value) in &config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            transport: None,
            auth: None,
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the maximum upload size in bytes.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config_builder = self.config_builder.max_file_size(bytes);
        self
    }

    /// Sets the number of status checks per uploaded document.
    pub fn poll_attempts(mut self, attempts: u32) -> Self {
        self.config_builder = self.config_builder.poll_attempts(attempts);
        self
    }

    /// Sets the delay between status checks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config_builder = self.config_builder.poll_interval(interval);
        self
    }

    /// Sets a wall-clock polling cutoff.
    pub fn poll_deadline(mut self, deadline: Duration) -> Self {
        self.config_builder = self.config_builder.poll_deadline(deadline);
        self
    }

    /// Replaces the polling schedule.
    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.config_builder = self.config_builder.poll(poll);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> SummarizerResult<SummarizerClient> {
        let config = Arc::new(self.config_builder.build()?);

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout).map_err(|e| {
                    SummarizerError::Configuration {
                        message: e.to_string(),
                    }
                })?,
            ),
        };

        // Deployments without a key talk to the API unauthenticated.
        let auth: Arc<dyn AuthProvider> = match (self.auth, config.api_key()) {
            (Some(a), _) => a,
            (None, Some(key)) => Arc::new(ApiKeyAuth::from_string(key)),
            (None, None) => Arc::new(NoAuth),
        };

        let executor = RequestExecutor::new(transport, auth, config.custom_headers.clone());

        tracing::debug!(base_url = %config.base_url, "Summarizer client created");

        Ok(SummarizerClient {
            summarization: SummarizationService::new(executor.clone(), Arc::clone(&config)),
            documents: DocumentsService::new(executor.clone(), Arc::clone(&config)),
            feedback: FeedbackService::new(executor.clone()),
            executor,
            config,
        })
    }
}
