//! Detail views derived from a [`RecognitionResult`].
//!
//! Neither constructor checks the source result's reason.  Use
//! [`RecognitionResult::cancellation_details`] or
//! [`RecognitionResult::no_match_details`] for the reason-checked variants.

use crate::engine::{status, EngineCall, EngineError, ResultHandle};
use crate::result::{
    CancellationErrorCode, CancellationReason, NoMatchReason, PropertyId, RecognitionResult,
    ResultReason,
};

fn live_handle(result: &RecognitionResult, call: EngineCall) -> Result<&ResultHandle, EngineError> {
    result
        .owned_handle()
        .get()
        .ok_or_else(|| EngineError::new(call, status::INVALID_HANDLE))
}

// ---------------------------------------------------------------------------
// CancellationDetails
// ---------------------------------------------------------------------------

/// Why a result was canceled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationDetails {
    reason: CancellationReason,
    error_code: CancellationErrorCode,
    error_details: String,
}

impl CancellationDetails {
    /// Query the cancellation fields of `result`.
    ///
    /// Succeeds for any live result, whatever its reason; the values are
    /// whatever the engine reports.
    pub fn from_result(result: &RecognitionResult) -> Result<Self, EngineError> {
        if result.reason() != ResultReason::Canceled {
            log::debug!(
                "cancellation details requested for result {} with reason {:?}",
                result.result_id(),
                result.reason()
            );
        }

        let handle = live_handle(result, EngineCall::CancellationReason)?;
        let engine = result.owned_handle().engine();
        let reason = engine.cancellation_reason(handle)?;
        let error_code = engine.cancellation_error_code(handle)?;
        let error_details = result
            .properties()
            .get_property(PropertyId::SpeechServiceResponseJsonErrorDetails)?;

        Ok(Self {
            reason,
            error_code,
            error_details,
        })
    }

    pub fn reason(&self) -> CancellationReason {
        self.reason
    }

    /// `NoError` unless [`reason`](Self::reason) is `Error`.
    pub fn error_code(&self) -> CancellationErrorCode {
        self.error_code
    }

    /// Error message from the service; empty when none was reported.
    pub fn error_details(&self) -> &str {
        &self.error_details
    }
}

// ---------------------------------------------------------------------------
// NoMatchDetails
// ---------------------------------------------------------------------------

/// Why speech was not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatchDetails {
    reason: NoMatchReason,
}

impl NoMatchDetails {
    pub fn from_result(result: &RecognitionResult) -> Result<Self, EngineError> {
        if result.reason() != ResultReason::NoMatch {
            log::debug!(
                "no-match details requested for result {} with reason {:?}",
                result.result_id(),
                result.reason()
            );
        }

        let handle = live_handle(result, EngineCall::NoMatchReason)?;
        let reason = result.owned_handle().engine().no_match_reason(handle)?;
        Ok(Self { reason })
    }

    pub fn reason(&self) -> NoMatchReason {
        self.reason
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::InMemoryEngine;
    use crate::fixture::FixtureResult;

    fn build(engine: &Arc<InMemoryEngine>, fixture: FixtureResult) -> RecognitionResult {
        let handle = engine.insert(fixture);
        RecognitionResult::from_handle(engine.clone(), handle).unwrap()
    }

    #[test]
    fn cancellation_details_read_engine_and_property() {
        let engine = Arc::new(InMemoryEngine::new());
        let result = build(
            &engine,
            FixtureResult::canceled(
                "c1",
                CancellationReason::Error,
                CancellationErrorCode::AuthenticationFailure,
                Some(r#"{"error":"bad key"}"#),
            ),
        );

        let details = CancellationDetails::from_result(&result).unwrap();
        assert_eq!(details.reason(), CancellationReason::Error);
        assert_eq!(details.error_code(), CancellationErrorCode::AuthenticationFailure);
        assert_eq!(details.error_details(), r#"{"error":"bad key"}"#);
    }

    #[test]
    fn cancellation_details_without_error_property_are_empty() {
        let engine = Arc::new(InMemoryEngine::new());
        let result = build(
            &engine,
            FixtureResult::canceled(
                "c2",
                CancellationReason::EndOfStream,
                CancellationErrorCode::NoError,
                None,
            ),
        );

        let details = CancellationDetails::from_result(&result).unwrap();
        assert_eq!(details.reason(), CancellationReason::EndOfStream);
        assert_eq!(details.error_details(), "");
    }

    #[test]
    fn cancellation_details_on_recognized_result_succeed() {
        let engine = Arc::new(InMemoryEngine::new());
        let result = build(&engine, FixtureResult::recognized("r", "hello"));

        let details = CancellationDetails::from_result(&result).unwrap();
        assert_eq!(details.reason(), CancellationReason::EndOfStream);
        assert_eq!(details.error_code(), CancellationErrorCode::NoError);
    }

    #[test]
    fn no_match_details_read_reason() {
        let engine = Arc::new(InMemoryEngine::new());
        let result = build(
            &engine,
            FixtureResult::no_match("n", NoMatchReason::InitialBabbleTimeout),
        );
        let details = NoMatchDetails::from_result(&result).unwrap();
        assert_eq!(details.reason(), NoMatchReason::InitialBabbleTimeout);
    }

    #[test]
    fn no_match_details_on_recognized_result_succeed() {
        let engine = Arc::new(InMemoryEngine::new());
        let result = build(&engine, FixtureResult::recognized("r", "hello"));
        let details = NoMatchDetails::from_result(&result).unwrap();
        assert_eq!(details.reason(), NoMatchReason::NotRecognized);
    }

    #[test]
    fn engine_failures_surface_as_errors() {
        let engine = Arc::new(InMemoryEngine::new());
        let result = build(
            &engine,
            FixtureResult::canceled(
                "c",
                CancellationReason::Error,
                CancellationErrorCode::RuntimeError,
                None,
            ),
        );

        engine.fail_on(EngineCall::CancellationErrorCode, status::RUNTIME_ERROR);
        let err = CancellationDetails::from_result(&result).unwrap_err();
        assert_eq!(err.call, EngineCall::CancellationErrorCode);

        engine.clear_faults();
        engine.fail_on(EngineCall::Property, status::RUNTIME_ERROR);
        let err = CancellationDetails::from_result(&result).unwrap_err();
        assert_eq!(err.call, EngineCall::Property);

        engine.clear_faults();
        engine.fail_on(EngineCall::NoMatchReason, status::INVALID_ARG);
        let err = NoMatchDetails::from_result(&result).unwrap_err();
        assert_eq!(err.code, status::INVALID_ARG);
    }

    #[test]
    fn details_after_release_report_invalid_handle() {
        let engine = Arc::new(InMemoryEngine::new());
        let mut result = build(&engine, FixtureResult::no_match("n", NoMatchReason::NotRecognized));
        result.release();

        let err = NoMatchDetails::from_result(&result).unwrap_err();
        assert_eq!(err, EngineError::new(EngineCall::NoMatchReason, status::INVALID_HANDLE));
        let err = CancellationDetails::from_result(&result).unwrap_err();
        assert_eq!(err.code, status::INVALID_HANDLE);
    }
}
