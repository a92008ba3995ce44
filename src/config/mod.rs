//! Configuration module for the summarizer client.
//!
//! Provides the API endpoint, optional credentials, request timeout, upload
//! limits and the status-polling schedule.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{SummarizerError, SummarizerResult};

/// Placeholder API endpoint used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum upload size (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default maximum length of directly submitted text, in characters.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 50_000;

/// File extensions accepted for upload.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["txt", "pdf", "docx", "doc"];

/// Default number of status checks per uploaded document.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;

/// Default delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Status-polling schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum number of status checks. This is the authoritative limit.
    pub max_attempts: u32,
    /// Fixed delay between two status checks.
    pub interval: Duration,
    /// Optional wall-clock cutoff measured from the first status check.
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }
}

impl PollConfig {
    /// Nominal upper bound on polling time, ignoring response latency.
    pub fn nominal_ceiling(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// Configuration for the summarizer client.
#[derive(Clone)]
pub struct SummarizerConfig {
    /// API key for authentication, if the deployment requires one.
    pub(crate) api_key: Option<SecretString>,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Largest accepted upload, in bytes.
    pub max_file_size: u64,
    /// Accepted upload extensions, lowercase and without the dot.
    pub allowed_extensions: Vec<String>,
    /// Longest accepted text submission, in characters.
    pub max_text_length: usize,
    /// Status-polling schedule.
    pub poll: PollConfig,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl SummarizerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SUMMARIZER_API_URL` (optional): API endpoint, defaults to a local placeholder
    /// - `SUMMARIZER_API_KEY` (optional): bearer token
    /// - `SUMMARIZER_TIMEOUT` (optional): request timeout in seconds
    /// - `SUMMARIZER_POLL_ATTEMPTS` (optional): status checks per document
    /// - `SUMMARIZER_POLL_INTERVAL_MS` (optional): delay between status checks
    pub fn from_env() -> SummarizerResult<Self> {
        let mut builder = SummarizerConfigBuilder::new();

        if let Ok(base_url) = std::env::var("SUMMARIZER_API_URL") {
            if !base_url.trim().is_empty() {
                builder = builder.base_url(base_url);
            }
        }

        if let Ok(api_key) = std::env::var("SUMMARIZER_API_KEY") {
            if !api_key.is_empty() {
                builder = builder.api_key(api_key);
            }
        }

        if let Ok(timeout_str) = std::env::var("SUMMARIZER_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        if let Ok(attempts_str) = std::env::var("SUMMARIZER_POLL_ATTEMPTS") {
            if let Some(attempts) = attempts_str.parse::<u32>().ok().filter(|n| *n >= 1) {
                builder = builder.poll_attempts(attempts);
            }
        }

        if let Ok(interval_str) = std::env::var("SUMMARIZER_POLL_INTERVAL_MS") {
            if let Ok(interval_ms) = interval_str.parse::<u64>() {
                builder = builder.poll_interval(Duration::from_millis(interval_ms));
            }
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }

    /// Returns true if a bearer token is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns true if the extension (without dot, any case) may be uploaded.
    pub fn is_extension_allowed(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.allowed_extensions.iter().any(|e| *e == extension)
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            poll: PollConfig::default(),
            custom_headers: Vec::new(),
        }
    }
}

impl std::fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_file_size", &self.max_file_size)
            .field("allowed_extensions", &self.allowed_extensions)
            .field("max_text_length", &self.max_text_length)
            .field("poll", &self.poll)
            .finish()
    }
}

/// Builder for `SummarizerConfig`.
#[derive(Default)]
pub struct SummarizerConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_file_size: Option<u64>,
    allowed_extensions: Option<Vec<String>>,
    max_text_length: Option<usize>,
    poll: PollConfig,
    custom_headers: Vec<(String, String)>,
}

impl SummarizerConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the maximum upload size in bytes.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Replaces the accepted upload extensions.
    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = Some(
            extensions
                .into_iter()
                .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        );
        self
    }

    /// Sets the maximum text length in characters.
    pub fn max_text_length(mut self, chars: usize) -> Self {
        self.max_text_length = Some(chars);
        self
    }

    /// Sets the number of status checks per uploaded document.
    pub fn poll_attempts(mut self, attempts: u32) -> Self {
        self.poll.max_attempts = attempts;
        self
    }

    /// Sets the delay between status checks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }

    /// Sets a wall-clock cutoff for polling on top of the attempt cap.
    pub fn poll_deadline(mut self, deadline: Duration) -> Self {
        self.poll.deadline = Some(deadline);
        self
    }

    /// Replaces the whole polling schedule.
    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> SummarizerResult<SummarizerConfig> {
        let defaults = SummarizerConfig::default();

        let base_url = self
            .base_url
            .unwrap_or(defaults.base_url)
            .trim()
            .trim_end_matches('/')
            .to_string();

        let parsed = url::Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SummarizerError::configuration(
                "Base URL must use http or https",
            ));
        }

        if self.poll.max_attempts == 0 {
            return Err(SummarizerError::configuration(
                "Polling needs at least one attempt",
            ));
        }

        let allowed_extensions = self
            .allowed_extensions
            .unwrap_or(defaults.allowed_extensions);
        if allowed_extensions.is_empty() {
            return Err(SummarizerError::configuration(
                "At least one upload extension must be allowed",
            ));
        }

        let api_key = match self.api_key {
            Some(key) if key.trim().is_empty() => {
                return Err(SummarizerError::configuration("API key cannot be empty"));
            }
            Some(key) => Some(SecretString::new(key)),
            None => None,
        };

        Ok(SummarizerConfig {
            api_key,
            base_url,
            timeout: self.timeout.unwrap_or(defaults.timeout),
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            allowed_extensions,
            max_text_length: self.max_text_length.unwrap_or(defaults.max_text_length),
            poll: self.poll,
            custom_headers: self.custom_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = SummarizerConfig::builder().build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.poll.max_attempts, 30);
        assert_eq!(config.poll.interval, Duration::from_secs(2));
        assert_eq!(config.poll.nominal_ceiling(), Duration::from_secs(60));
        assert!(!config.has_api_key());
    }

    const ENV_VARS: [&str; 5] = [
        "SUMMARIZER_API_URL",
        "SUMMARIZER_API_KEY",
        "SUMMARIZER_TIMEOUT",
        "SUMMARIZER_POLL_ATTEMPTS",
        "SUMMARIZER_POLL_INTERVAL_MS",
    ];

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    /// Runs `f` with exactly `vars` set among the summarizer variables.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
        for (name, value) in vars {
            std::env::set_var(name, value);
        }
        let result = f();
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
        result
    }

    #[test]
    fn test_from_env_defaults() {
        let config = with_env(&[], SummarizerConfig::from_env).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll.max_attempts, DEFAULT_POLL_ATTEMPTS);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_from_env_reads_values() {
        let config = with_env(
            &[
                ("SUMMARIZER_API_URL", "https://summaries.example.com/api/v1"),
                ("SUMMARIZER_API_KEY", "env-key"),
                ("SUMMARIZER_TIMEOUT", "5"),
                ("SUMMARIZER_POLL_ATTEMPTS", "12"),
                ("SUMMARIZER_POLL_INTERVAL_MS", "250"),
            ],
            SummarizerConfig::from_env,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://summaries.example.com/api/v1");
        assert_eq!(config.api_key(), Some("env-key"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.poll.max_attempts, 12);
        assert_eq!(config.poll.interval, Duration::from_millis(250));
    }

    #[test]
    fn test_from_env_blank_url_uses_placeholder() {
        let config =
            with_env(&[("SUMMARIZER_API_URL", "   ")], SummarizerConfig::from_env).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_env_ignores_invalid_numbers() {
        let config = with_env(
            &[
                ("SUMMARIZER_TIMEOUT", "soon"),
                ("SUMMARIZER_POLL_ATTEMPTS", "0"),
                ("SUMMARIZER_POLL_INTERVAL_MS", "-5"),
            ],
            SummarizerConfig::from_env,
        )
        .unwrap();

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.poll.max_attempts, DEFAULT_POLL_ATTEMPTS);
        assert_eq!(config.poll.interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_from_env_rejects_invalid_url() {
        let result = with_env(
            &[("SUMMARIZER_API_URL", "not a url")],
            SummarizerConfig::from_env,
        );
        assert!(matches!(result, Err(SummarizerError::Configuration { .. })));
    }

    #[test]
    fn test_config_builder_custom() {
        let config = SummarizerConfig::builder()
            .base_url("https://summaries.example.com/api/v1/")
            .api_key("secret-token")
            .timeout(Duration::from_secs(5))
            .poll_attempts(5)
            .poll_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://summaries.example.com/api/v1");
        assert_eq!(config.api_key(), Some("secret-token"));
        assert_eq!(config.poll.max_attempts, 5);
    }

    #[test]
    fn test_config_rejects_bad_url() {
        assert!(SummarizerConfig::builder().base_url("not a url").build().is_err());
        assert!(SummarizerConfig::builder()
            .base_url("ftp://files.example.com")
            .build()
            .is_err());
    }

    #[test]
    fn test_config_rejects_zero_attempts() {
        let result = SummarizerConfig::builder().poll_attempts(0).build();
        assert!(matches!(result, Err(SummarizerError::Configuration { .. })));
    }

    #[test]
    fn test_config_rejects_empty_api_key() {
        assert!(SummarizerConfig::builder().api_key("  ").build().is_err());
    }

    #[test]
    fn test_endpoint_url() {
        let config = SummarizerConfig::builder().build().unwrap();
        assert_eq!(
            config.endpoint_url("/documents/d1"),
            "http://localhost:8000/api/v1/documents/d1"
        );
    }

    #[test]
    fn test_extension_check() {
        let config = SummarizerConfig::builder()
            .allowed_extensions([".TXT", "md"])
            .build()
            .unwrap();

        assert!(config.is_extension_allowed("txt"));
        assert!(config.is_extension_allowed(".MD"));
        assert!(!config.is_extension_allowed("pdf"));
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = SummarizerConfig::builder()
            .api_key("super-secret")
            .build()
            .unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret"));
    }
}
