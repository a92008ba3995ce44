//! Summarization model catalogue types.

use serde::{Deserialize, Serialize};

/// A summarization model offered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelInfo {
    /// Display name.
    pub name: String,

    /// Short description.
    #[serde(default)]
    pub description: Option<String>,

    /// Model type, used as the lookup key.
    #[serde(rename = "type")]
    pub model_type: String,

    /// Model version.
    #[serde(default)]
    pub version: Option<String>,

    /// Availability (`active`, `beta`, ...).
    #[serde(default)]
    pub status: Option<String>,
}

impl ModelInfo {
    /// Returns true if the model is generally available.
    pub fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "active")
    }
}

/// Response to `GET /summarize/models`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelList {
    /// Available models.
    pub models: Vec<ModelInfo>,
}

impl ModelList {
    /// Finds a model by type.
    pub fn find(&self, model_type: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.model_type == model_type)
    }

    /// Returns model types in catalogue order.
    pub fn types(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.model_type.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_list_parsing() {
        let list: ModelList = serde_json::from_str(
            r#"{"models":[
                {"name":"TextRank Extractive Summarizer","type":"extractive","version":"1.0.0","status":"active"},
                {"name":"Mock Abstractive Summarizer","type":"abstractive","version":"0.1.0","status":"beta"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(list.types(), vec!["extractive", "abstractive"]);
        assert!(list.find("extractive").unwrap().is_active());
        assert!(!list.find("abstractive").unwrap().is_active());
        assert!(list.find("bullet").is_none());
    }
}
