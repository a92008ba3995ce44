//! Summary options chosen by the user.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::errors::SummarizerError;

/// Smallest accepted value for either length bound.
pub const MIN_LENGTH_BOUND: u32 = 20;

/// Largest accepted value for either length bound.
pub const MAX_LENGTH_BOUND: u32 = 500;

/// Output layout of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    /// Continuous prose.
    #[default]
    Paragraph,
    /// Unordered bullet list.
    Bullets,
    /// Numbered list.
    Numbered,
}

impl SummaryFormat {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Bullets => "bullets",
            Self::Numbered => "numbered",
        }
    }
}

/// Options sent with every summarization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Upper bound on summary length (20-500).
    pub max_length: u32,
    /// Lower bound on summary length (20-500, not above `max_length`).
    pub min_length: u32,
    /// Model to summarize with.
    pub model_id: String,
    /// Sampling temperature (0.0-1.0).
    pub temperature: f32,
    /// Output layout.
    pub format: SummaryFormat,
    /// Whether to extract keywords alongside the summary.
    pub include_keywords: bool,
    /// ISO 639 language code or `"auto"`.
    pub language: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 40,
            model_id: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
            format: SummaryFormat::Paragraph,
            include_keywords: false,
            language: "auto".to_string(),
        }
    }
}

impl SummaryOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder.
    pub fn builder() -> SummaryOptionsBuilder {
        SummaryOptionsBuilder::new()
    }

    /// Returns every violated constraint; empty when the options are valid.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let bounds = MIN_LENGTH_BOUND..=MAX_LENGTH_BOUND;

        if !bounds.contains(&self.max_length) {
            violations.push(format!(
                "Maximum length must be between {} and {} (got {})",
                MIN_LENGTH_BOUND, MAX_LENGTH_BOUND, self.max_length
            ));
        }

        if !bounds.contains(&self.min_length) {
            violations.push(format!(
                "Minimum length must be between {} and {} (got {})",
                MIN_LENGTH_BOUND, MAX_LENGTH_BOUND, self.min_length
            ));
        }

        if self.min_length > self.max_length {
            violations.push(format!(
                "Minimum length ({}) cannot exceed maximum length ({})",
                self.min_length, self.max_length
            ));
        }

        if self.model_id.trim().is_empty() {
            violations.push("A model must be selected".to_string());
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            violations.push(format!(
                "Temperature must be between 0.0 and 1.0 (got {})",
                self.temperature
            ));
        }

        if !is_valid_language(&self.language) {
            violations.push(format!(
                "Language must be an ISO 639 code or \"auto\" (got \"{}\")",
                self.language
            ));
        }

        violations
    }

    /// Validates the options.
    pub fn validate(&self) -> Result<(), SummarizerError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SummarizerError::violations(violations))
        }
    }

    /// Flattens the options into `(field, value)` pairs for multipart forms.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("max_length", self.max_length.to_string()),
            ("min_length", self.min_length.to_string()),
            ("model_id", self.model_id.clone()),
            ("temperature", self.temperature.to_string()),
            ("format", self.format.as_str().to_string()),
            ("include_keywords", self.include_keywords.to_string()),
            ("language", self.language.clone()),
        ]
    }
}

fn is_valid_language(language: &str) -> bool {
    if language == "auto" {
        return true;
    }
    language_pattern().is_some_and(|re| re.is_match(language))
}

fn language_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2})?$").ok())
        .as_ref()
}

/// Builder for [`SummaryOptions`], starting from the defaults.
#[derive(Debug, Default)]
pub struct SummaryOptionsBuilder {
    options: SummaryOptions,
}

impl SummaryOptionsBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum length.
    pub fn max_length(mut self, max_length: u32) -> Self {
        self.options.max_length = max_length;
        self
    }

    /// Sets the minimum length.
    pub fn min_length(mut self, min_length: u32) -> Self {
        self.options.min_length = min_length;
        self
    }

    /// Sets the model.
    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.options.model_id = model_id.into();
        self
    }

    /// Sets the temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = temperature;
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: SummaryFormat) -> Self {
        self.options.format = format;
        self
    }

    /// Enables keyword extraction.
    pub fn include_keywords(mut self, include: bool) -> Self {
        self.options.include_keywords = include;
        self
    }

    /// Sets the language.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.options.language = language.into();
        self
    }

    /// Builds and validates the options.
    pub fn build(self) -> Result<SummaryOptions, SummarizerError> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SummaryOptions::default().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = SummaryOptions::builder()
            .max_length(200)
            .min_length(50)
            .model("bart-large-cnn")
            .format(SummaryFormat::Bullets)
            .language("en")
            .build()
            .unwrap();

        assert_eq!(options.max_length, 200);
        assert_eq!(options.format, SummaryFormat::Bullets);
    }

    #[test]
    fn test_inverted_lengths_rejected() {
        let result = SummaryOptions::builder()
            .max_length(40)
            .min_length(150)
            .build();

        let err = result.unwrap_err();
        assert!(err
            .violation_list()
            .iter()
            .any(|v| v.contains("cannot exceed")));
    }

    #[test_case(19, 40 ; "max below range")]
    #[test_case(501, 40 ; "max above range")]
    #[test_case(150, 10 ; "min below range")]
    fn test_out_of_range_lengths(max: u32, min: u32) {
        let options = SummaryOptions {
            max_length: max,
            min_length: min,
            ..SummaryOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test_case("auto", true)]
    #[test_case("en", true)]
    #[test_case("pt-BR", true)]
    #[test_case("english", false)]
    #[test_case("", false)]
    fn test_language_codes(language: &str, valid: bool) {
        assert_eq!(is_valid_language(language), valid);
    }

    #[test]
    fn test_language_pattern_compiled_once() {
        let first = language_pattern().unwrap();
        let second = language_pattern().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_all_violations_reported() {
        let options = SummaryOptions {
            max_length: 600,
            min_length: 700,
            model_id: String::new(),
            temperature: 1.5,
            ..SummaryOptions::default()
        };
        assert_eq!(options.violations().len(), 5);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(SummaryOptions::default()).unwrap();
        assert_eq!(json["max_length"], 150);
        assert_eq!(json["model_id"], "gpt-3.5-turbo");
        assert_eq!(json["format"], "paragraph");
    }
}
