//! Plain-data summaries of recognition results for printing.
//!
//! [`ResultSummary::from_result`] snapshots a [`RecognitionResult`] and, when
//! the reason calls for it, its cancellation or no-match details.

use serde::Serialize;

use crate::config::{OutputConfig, OutputFormat};
use crate::engine::EngineError;
use crate::result::{
    CancellationErrorCode, CancellationReason, NoMatchReason, PropertyId, RecognitionResult,
    ResultReason,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancellationSummary {
    pub reason: CancellationReason,
    pub error_code: CancellationErrorCode,
    pub error_details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub id: String,
    pub reason: ResultReason,
    pub text: String,
    pub offset_secs: f64,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<CancellationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_match_reason: Option<NoMatchReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_json: Option<String>,
}

impl ResultSummary {
    pub fn from_result(
        result: &RecognitionResult,
        output: &OutputConfig,
    ) -> Result<Self, EngineError> {
        let cancellation = result.cancellation_details()?.map(|d| CancellationSummary {
            reason: d.reason(),
            error_code: d.error_code(),
            error_details: d.error_details().to_string(),
        });
        let no_match_reason = result.no_match_details()?.map(|d| d.reason());

        let service_json = if output.show_properties {
            Some(
                result
                    .properties()
                    .get_property(PropertyId::SpeechServiceResponseJson)?,
            )
        } else {
            None
        };

        Ok(Self {
            id: result.result_id().to_string(),
            reason: result.reason(),
            text: result.text().to_string(),
            offset_secs: result.offset_time().as_secs_f64(),
            duration_secs: result.duration_time().as_secs_f64(),
            cancellation,
            no_match_reason,
            service_json,
        })
    }

    /// One-line human-readable rendering.
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "[{}] {:?} @{:.2}s +{:.2}s",
            self.id, self.reason, self.offset_secs, self.duration_secs
        );
        if !self.text.is_empty() {
            line.push_str(&format!(" {:?}", self.text));
        }
        if let Some(c) = &self.cancellation {
            line.push_str(&format!(" canceled: {:?}/{:?}", c.reason, c.error_code));
            if !c.error_details.is_empty() {
                line.push_str(&format!(" ({})", c.error_details));
            }
        }
        if let Some(reason) = self.no_match_reason {
            line.push_str(&format!(" no match: {reason:?}"));
        }
        if let Some(json) = self.service_json.as_deref().filter(|j| !j.is_empty()) {
            line.push_str(&format!(" json={json}"));
        }
        line
    }
}

/// Render summaries in the configured format.
pub fn render(summaries: &[ResultSummary], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(summaries
            .iter()
            .map(ResultSummary::to_line)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => serde_json::to_string_pretty(summaries),
    }
}
