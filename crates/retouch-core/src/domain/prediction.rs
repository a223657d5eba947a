//! Prediction record: one in-flight remote computation.
//!
//! Created by the submit call, mutated only by the provider; the client
//! re-reads it until a terminal state or the deadline, then drops it. No
//! prediction survives past a single enhancement call.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque provider-assigned prediction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(String);

impl PredictionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire status of a prediction.
///
/// Providers expose finer-grained intermediate statuses; the client only
/// distinguishes terminal success, terminal failure, and not-yet-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,

    /// Any status string this client does not know. Non-terminal: the poll
    /// loop keeps waiting, bounded by the deadline.
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Output of a succeeded prediction: a single URL or an ordered list of
/// candidates, of which the first is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutput {
    One(String),
    Many(Vec<String>),
}

impl PredictionOutput {
    /// The authoritative candidate. `None` when the provider returned an
    /// empty array.
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::One(url) => Some(url),
            Self::Many(urls) => urls.first().map(String::as_str),
        }
    }
}

/// One in-flight remote computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    pub status: PredictionStatus,

    /// Present only when `status` is `Succeeded`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PredictionOutput>,

    /// Provider diagnostic, present only when `status` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Provider-side creation timestamp. Informational only: deadline math
    /// uses the local clock, never this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_a_freshly_created_prediction() {
        let json = r#"
        {
          "id": "gm3qorzdhgbfurvjtvhg6dckhu",
          "status": "starting",
          "created_at": "2024-03-01T12:00:00Z"
        }"#;
        let prediction: Prediction = serde_json::from_str(json).expect("deserialize");
        assert_eq!(prediction.id.as_str(), "gm3qorzdhgbfurvjtvhg6dckhu");
        assert_eq!(prediction.status, PredictionStatus::Starting);
        assert!(prediction.output.is_none());
        assert!(prediction.error.is_none());
        assert!(prediction.created_at.is_some());
    }

    #[test]
    fn parses_single_and_array_outputs() {
        let single: Prediction = serde_json::from_str(
            r#"{"id": "p1", "status": "succeeded", "output": "https://example.com/out.png"}"#,
        )
        .unwrap();
        assert_eq!(
            single.output.unwrap().primary(),
            Some("https://example.com/out.png")
        );

        let array: Prediction = serde_json::from_str(
            r#"{"id": "p2", "status": "succeeded", "output": ["https://example.com/a.png", "https://example.com/b.png"]}"#,
        )
        .unwrap();
        assert_eq!(
            array.output.unwrap().primary(),
            Some("https://example.com/a.png")
        );
    }

    #[test]
    fn empty_array_output_has_no_primary() {
        let output = PredictionOutput::Many(vec![]);
        assert_eq!(output.primary(), None);
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let prediction: Prediction =
            serde_json::from_str(r#"{"id": "p1", "status": "booting"}"#).unwrap();
        assert_eq!(prediction.status, PredictionStatus::Unknown);
        assert!(!prediction.status.is_terminal());
    }

    #[rstest]
    #[case::starting(PredictionStatus::Starting, false)]
    #[case::processing(PredictionStatus::Processing, false)]
    #[case::unknown(PredictionStatus::Unknown, false)]
    #[case::succeeded(PredictionStatus::Succeeded, true)]
    #[case::failed(PredictionStatus::Failed, true)]
    #[case::canceled(PredictionStatus::Canceled, true)]
    fn terminal_statuses(#[case] status: PredictionStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }
}
