//! Common types shared across the summarization API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Statistics the API reports alongside a generated summary.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SummaryStats {
    /// Length of the source text in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_length: Option<u64>,

    /// Length of the summary in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_length: Option<u64>,

    /// `1 - summary_length / original_length`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,

    /// Summarization strategy used by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_type: Option<String>,
}

impl SummaryStats {
    /// Returns true if the API sent none of the statistics.
    pub fn is_empty(&self) -> bool {
        self.original_length.is_none()
            && self.summary_length.is_none()
            && self.compression_ratio.is_none()
            && self.summary_type.is_none()
    }
}

/// Deserializes an optional timestamp that may or may not carry a zone.
///
/// The backend emits naive ISO-8601 timestamps; those are taken as UTC.
pub(crate) fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "deserialize_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_timestamp_with_zone() {
        let s: Stamped = serde_json::from_str(r#"{"at":"2024-03-01T10:00:00Z"}"#).unwrap();
        assert_eq!(s.at.unwrap().to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let s: Stamped =
            serde_json::from_str(r#"{"at":"2024-03-01T10:00:00.123456"}"#).unwrap();
        assert_eq!(s.at.unwrap().timestamp(), 1_709_287_200);
    }

    #[test]
    fn test_missing_timestamp() {
        let s: Stamped = serde_json::from_str("{}").unwrap();
        assert!(s.at.is_none());
    }

    #[test]
    fn test_stats_is_empty() {
        let stats: SummaryStats = serde_json::from_str("{}").unwrap();
        assert!(stats.is_empty());
    }
}
