//! JSON fixtures describing recognition results.
//!
//! A fixture file is a JSON array of [`FixtureResult`] objects:
//!
//! ```json
//! [
//!   { "id": "abc123", "reason": "RecognizedSpeech", "text": "hello world",
//!     "offset": 5000000, "duration": 10000000 },
//!   { "id": "c1", "reason": "Canceled",
//!     "cancellation": { "reason": "Error", "error_code": "ConnectionFailure" },
//!     "properties": { "SpeechServiceResponse_JsonErrorDetails": "socket closed" } }
//! ]
//! ```
//!
//! Missing fields take the values an engine reports for a result that never
//! set them: empty strings, zero ticks, `EndOfStream` / `NoError` for the
//! cancellation block and `NotRecognized` for the no-match reason.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::result::{CancellationErrorCode, CancellationReason, NoMatchReason, ResultReason};

/// Cancellation fields an engine reports for a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureCancellation {
    pub reason: CancellationReason,
    #[serde(default)]
    pub error_code: CancellationErrorCode,
}

impl Default for FixtureCancellation {
    fn default() -> Self {
        Self {
            reason: CancellationReason::EndOfStream,
            error_code: CancellationErrorCode::NoError,
        }
    }
}

fn default_no_match_reason() -> NoMatchReason {
    NoMatchReason::NotRecognized
}

/// One engine-side recognition result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureResult {
    #[serde(default)]
    pub id: String,
    pub reason: ResultReason,
    #[serde(default)]
    pub text: String,
    /// Offset in ticks.
    #[serde(default)]
    pub offset: u64,
    /// Duration in ticks.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub cancellation: FixtureCancellation,
    #[serde(default = "default_no_match_reason")]
    pub no_match_reason: NoMatchReason,
}

impl FixtureResult {
    /// A `RecognizedSpeech` result with zero offset and duration.
    pub fn recognized(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: ResultReason::RecognizedSpeech,
            text: text.into(),
            offset: 0,
            duration: 0,
            properties: BTreeMap::new(),
            cancellation: FixtureCancellation::default(),
            no_match_reason: default_no_match_reason(),
        }
    }

    /// A `Canceled` result.  `error_details` is stored under
    /// `SpeechServiceResponse_JsonErrorDetails` when given.
    pub fn canceled(
        id: impl Into<String>,
        reason: CancellationReason,
        error_code: CancellationErrorCode,
        error_details: Option<&str>,
    ) -> Self {
        let mut fixture = Self {
            reason: ResultReason::Canceled,
            cancellation: FixtureCancellation { reason, error_code },
            ..Self::recognized(id, "")
        };
        if let Some(details) = error_details {
            fixture.properties.insert(
                "SpeechServiceResponse_JsonErrorDetails".into(),
                details.to_string(),
            );
        }
        fixture
    }

    /// A `NoMatch` result.
    pub fn no_match(id: impl Into<String>, reason: NoMatchReason) -> Self {
        Self {
            reason: ResultReason::NoMatch,
            no_match_reason: reason,
            ..Self::recognized(id, "")
        }
    }
}

/// Parse a fixture array from JSON text.
pub fn parse_fixtures(json: &str) -> Result<Vec<FixtureResult>> {
    let fixtures: Vec<FixtureResult> =
        serde_json::from_str(json).context("invalid result fixture JSON")?;
    Ok(fixtures)
}

/// Read and parse a fixture file.
pub fn load_fixtures(path: &Path) -> Result<Vec<FixtureResult>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture file {}", path.display()))?;
    parse_fixtures(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_full_and_minimal_entries() {
        let json = r#"[
            { "id": "abc123", "reason": "RecognizedSpeech", "text": "hello world",
              "offset": 5000000, "duration": 10000000 },
            { "reason": "NoMatch", "no_match_reason": "InitialSilenceTimeout" }
        ]"#;

        let fixtures = parse_fixtures(json).expect("parse");
        assert_eq!(fixtures.len(), 2);

        let first = &fixtures[0];
        assert_eq!(first.id, "abc123");
        assert_eq!(first.reason, ResultReason::RecognizedSpeech);
        assert_eq!(first.offset, 5_000_000);
        assert_eq!(first.duration, 10_000_000);
        assert!(first.properties.is_empty());
        assert_eq!(first.cancellation, FixtureCancellation::default());

        let second = &fixtures[1];
        assert_eq!(second.id, "");
        assert_eq!(second.no_match_reason, NoMatchReason::InitialSilenceTimeout);
    }

    #[test]
    fn cancellation_error_code_defaults_to_no_error() {
        let json = r#"[{ "id": "c", "reason": "Canceled",
                         "cancellation": { "reason": "Error" } }]"#;
        let fixtures = parse_fixtures(json).expect("parse");
        assert_eq!(fixtures[0].cancellation.reason, CancellationReason::Error);
        assert_eq!(fixtures[0].cancellation.error_code, CancellationErrorCode::NoError);
    }

    #[test]
    fn unknown_reason_is_rejected() {
        let err = parse_fixtures(r#"[{ "reason": "Whatever" }]"#).unwrap_err();
        assert!(err.to_string().contains("fixture"));
    }

    #[test]
    fn canceled_helper_stores_error_details() {
        let f = FixtureResult::canceled(
            "c1",
            CancellationReason::Error,
            CancellationErrorCode::ServiceTimeout,
            Some("timed out"),
        );
        assert_eq!(f.reason, ResultReason::Canceled);
        assert_eq!(
            f.properties.get("SpeechServiceResponse_JsonErrorDetails").map(String::as_str),
            Some("timed out")
        );
    }

    #[test]
    fn load_missing_file_errors_with_path() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("missing.json");
        let err = load_fixtures(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("results.json");
        std::fs::write(&path, r#"[{ "id": "x", "reason": "Canceled" }]"#).expect("write");

        let fixtures = load_fixtures(&path).expect("load");
        assert_eq!(fixtures[0].reason, ResultReason::Canceled);
        assert_eq!(fixtures[0].cancellation.reason, CancellationReason::EndOfStream);
    }
}
