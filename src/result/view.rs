//! Immutable view over an engine-side recognition result.
//!
//! [`RecognitionResult::from_handle`] takes ownership of a [`ResultHandle`],
//! reads every field once, and caches the values.  The handle is released
//! exactly once: by [`RecognitionResult::release`], by `Drop`, or by the
//! failed constructor itself.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::{EngineError, ResultEngine, ResultHandle};
use crate::result::details::{CancellationDetails, NoMatchDetails};
use crate::result::properties::PropertyCollection;
use crate::result::ResultReason;

/// Ticks per second; one tick is 100 ns.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Convert 100 ns ticks to a [`Duration`].
///
/// ```
/// use std::time::Duration;
/// use speech_result::result::ticks_to_duration;
///
/// assert_eq!(ticks_to_duration(5_000_000), Duration::from_millis(500));
/// ```
pub fn ticks_to_duration(ticks: u64) -> Duration {
    let secs = ticks / TICKS_PER_SECOND;
    let nanos = (ticks % TICKS_PER_SECOND) * 100;
    Duration::new(secs, nanos as u32)
}

// ---------------------------------------------------------------------------
// OwnedResultHandle
// ---------------------------------------------------------------------------

/// Exclusive owner of a [`ResultHandle`]; releases it once, on drop at the
/// latest.
///
/// The handle is moved in, so no second owner can exist:
///
/// ```compile_fail
/// use std::sync::Arc;
/// use speech_result::engine::InMemoryEngine;
/// use speech_result::fixture::FixtureResult;
/// use speech_result::result::OwnedResultHandle;
///
/// let engine = Arc::new(InMemoryEngine::new());
/// let handle = engine.insert(FixtureResult::recognized("id", "text"));
/// let first = OwnedResultHandle::new(engine.clone(), handle);
/// let second = OwnedResultHandle::new(engine.clone(), handle); // use of moved value
/// ```
pub struct OwnedResultHandle {
    engine: Arc<dyn ResultEngine>,
    handle: Option<ResultHandle>,
}

impl fmt::Debug for OwnedResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedResultHandle")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl OwnedResultHandle {
    pub fn new(engine: Arc<dyn ResultEngine>, handle: ResultHandle) -> Self {
        Self {
            engine,
            handle: Some(handle),
        }
    }

    /// The live handle, or `None` once released.
    pub(crate) fn get(&self) -> Option<&ResultHandle> {
        self.handle.as_ref()
    }

    pub(crate) fn engine(&self) -> &Arc<dyn ResultEngine> {
        &self.engine
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// Release the handle.  Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            let raw = handle.as_raw();
            match self.engine.release_result(handle) {
                Ok(()) => log::debug!("released result handle {raw}"),
                Err(e) => log::warn!("failed to release result handle {raw}: {e}"),
            }
        }
    }
}

impl Drop for OwnedResultHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// ---------------------------------------------------------------------------
// RecognitionResult
// ---------------------------------------------------------------------------

/// A recognition outcome with every field read once from the engine.
///
/// Fields are never re-queried; getters are pure reads.
pub struct RecognitionResult {
    handle: OwnedResultHandle,
    result_id: String,
    reason: ResultReason,
    text: String,
    offset: u64,
    duration: u64,
    properties: PropertyCollection,
}

impl fmt::Debug for RecognitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognitionResult")
            .field("result_id", &self.result_id)
            .field("reason", &self.reason)
            .field("text", &self.text)
            .field("offset", &self.offset)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

struct Fields {
    result_id: String,
    reason: ResultReason,
    text: String,
    offset: u64,
    duration: u64,
    properties: PropertyCollection,
}

impl Fields {
    fn read(engine: &Arc<dyn ResultEngine>, handle: &ResultHandle) -> Result<Self, EngineError> {
        let properties = PropertyCollection::new(Arc::clone(engine), engine.property_bag(handle)?);
        Ok(Self {
            result_id: engine.result_id(handle)?,
            reason: engine.reason(handle)?,
            text: engine.text(handle)?,
            offset: engine.offset(handle)?,
            duration: engine.duration(handle)?,
            properties,
        })
    }
}

impl RecognitionResult {
    /// Take ownership of `handle` and read the result's fields.
    ///
    /// # Errors
    ///
    /// The first failing engine query is returned unchanged.  The handle (and
    /// the property bag, if already acquired) is released before returning.
    ///
    /// The handle is consumed; building a second view from it does not
    /// compile:
    ///
    /// ```compile_fail
    /// use std::sync::Arc;
    /// use speech_result::engine::InMemoryEngine;
    /// use speech_result::fixture::FixtureResult;
    /// use speech_result::result::RecognitionResult;
    ///
    /// let engine = Arc::new(InMemoryEngine::new());
    /// let handle = engine.insert(FixtureResult::recognized("id", "text"));
    /// let first = RecognitionResult::from_handle(engine.clone(), handle);
    /// let second = RecognitionResult::from_handle(engine.clone(), handle); // use of moved value
    /// ```
    pub fn from_handle(
        engine: Arc<dyn ResultEngine>,
        handle: ResultHandle,
    ) -> Result<Self, EngineError> {
        let fields = Fields::read(&engine, &handle);
        // Owned before the error check so a failed read still releases it.
        let owned = OwnedResultHandle::new(engine, handle);
        let Fields {
            result_id,
            reason,
            text,
            offset,
            duration,
            properties,
        } = fields?;

        Ok(Self {
            handle: owned,
            result_id,
            reason,
            text,
            offset,
            duration,
            properties,
        })
    }

    /// Unique result id.
    pub fn result_id(&self) -> &str {
        &self.result_id
    }

    pub fn reason(&self) -> ResultReason {
        self.reason
    }

    /// Normalized recognized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Offset of the recognized speech, in ticks.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Duration of the recognized speech, in ticks.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn offset_time(&self) -> Duration {
        ticks_to_duration(self.offset)
    }

    pub fn duration_time(&self) -> Duration {
        ticks_to_duration(self.duration)
    }

    /// Additional result properties.
    pub fn properties(&self) -> &PropertyCollection {
        &self.properties
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }

    /// Release the engine handle now.  Idempotent; `Drop` calls it too.
    ///
    /// Cached fields stay readable.  Detail lookups fail afterwards because
    /// they need the live handle.
    pub fn release(&mut self) {
        self.handle.release();
    }

    /// Cancellation details when the reason is `Canceled`, otherwise `None`
    /// without touching the engine.
    pub fn cancellation_details(&self) -> Result<Option<CancellationDetails>, EngineError> {
        if self.reason != ResultReason::Canceled {
            return Ok(None);
        }
        CancellationDetails::from_result(self).map(Some)
    }

    /// No-match details when the reason is `NoMatch`, otherwise `None`
    /// without touching the engine.
    pub fn no_match_details(&self) -> Result<Option<NoMatchDetails>, EngineError> {
        if self.reason != ResultReason::NoMatch {
            return Ok(None);
        }
        NoMatchDetails::from_result(self).map(Some)
    }

    pub(crate) fn owned_handle(&self) -> &OwnedResultHandle {
        &self.handle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{status, EngineCall, InMemoryEngine};
    use crate::fixture::FixtureResult;
    use crate::result::{CancellationErrorCode, CancellationReason, NoMatchReason, PropertyId};

    fn engine() -> Arc<InMemoryEngine> {
        Arc::new(InMemoryEngine::new())
    }

    fn hello_world() -> FixtureResult {
        FixtureResult {
            offset: 5_000_000,
            duration: 10_000_000,
            ..FixtureResult::recognized("abc123", "hello world")
        }
    }

    // --- fidelity ---

    #[test]
    fn fields_match_engine_values() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();

        assert_eq!(result.result_id(), "abc123");
        assert_eq!(result.reason(), ResultReason::RecognizedSpeech);
        assert_eq!(result.text(), "hello world");
        assert_eq!(result.offset(), 5_000_000);
        assert_eq!(result.duration(), 10_000_000);
        assert_eq!(result.offset_time(), Duration::from_millis(500));
        assert_eq!(result.duration_time(), Duration::from_secs(1));
    }

    #[test]
    fn getters_do_not_requery_engine() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();

        engine.fail_on(EngineCall::Text, status::RUNTIME_ERROR);
        engine.fail_on(EngineCall::ResultId, status::RUNTIME_ERROR);
        assert_eq!(result.text(), "hello world");
        assert_eq!(result.result_id(), "abc123");
    }

    // --- release ---

    #[test]
    fn drop_releases_handle_once() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let raw = handle.as_raw();
        let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
        assert_eq!(engine.release_count(raw), 0);

        drop(result);
        assert_eq!(engine.release_count(raw), 1);
        assert_eq!(engine.live_results(), 0);
        assert_eq!(engine.live_property_bags(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let raw = handle.as_raw();
        let mut result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();

        result.release();
        result.release();
        assert!(result.is_released());
        drop(result);
        assert_eq!(engine.release_count(raw), 1);
    }

    #[test]
    fn each_view_releases_its_own_handle_once() {
        let engine = engine();
        let raws: Vec<u64> = (0..3)
            .map(|i| {
                let handle = engine.insert(FixtureResult::recognized(format!("r{i}"), "text"));
                let raw = handle.as_raw();
                let mut result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
                result.release();
                drop(result);
                raw
            })
            .collect();

        for raw in raws {
            assert_eq!(engine.release_count(raw), 1, "handle {raw}");
        }
        assert_eq!(engine.live_results(), 0);
    }

    #[test]
    fn cached_fields_survive_release() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let mut result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
        result.release();
        assert_eq!(result.text(), "hello world");
    }

    #[test]
    fn failed_construction_releases_handle_and_bag() {
        for call in [
            EngineCall::PropertyBag,
            EngineCall::ResultId,
            EngineCall::Reason,
            EngineCall::Text,
            EngineCall::Offset,
            EngineCall::Duration,
        ] {
            let engine = engine();
            let handle = engine.insert(hello_world());
            let raw = handle.as_raw();
            engine.fail_on(call, status::RUNTIME_ERROR);

            let err = RecognitionResult::from_handle(engine.clone(), handle).unwrap_err();
            assert_eq!(err.call, call);
            assert_eq!(err.code, status::RUNTIME_ERROR);
            assert_eq!(engine.release_count(raw), 1, "call {call}");
            assert_eq!(engine.live_property_bags(), 0, "call {call}");
        }
    }

    #[test]
    fn invalid_handle_surfaces_engine_status() {
        let engine = engine();
        let err = RecognitionResult::from_handle(engine.clone(), ResultHandle::from_raw(77))
            .unwrap_err();
        assert_eq!(err.code, status::INVALID_HANDLE);
    }

    #[test]
    fn owned_handle_release_failure_is_not_retried() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let raw = handle.as_raw();
        engine.fail_on(EngineCall::ReleaseResult, status::RUNTIME_ERROR);

        let mut owned = OwnedResultHandle::new(engine.clone(), handle);
        owned.release();
        assert!(owned.is_released());
        engine.clear_faults();
        drop(owned);
        assert_eq!(engine.release_count(raw), 0);
    }

    // --- truncation ---

    #[test]
    fn bounded_backend_truncates_text() {
        let engine = Arc::new(InMemoryEngine::new().with_string_limit(crate::engine::MAX_CHAR_COUNT));
        let long = "a".repeat(crate::engine::MAX_CHAR_COUNT + 10);
        let handle = engine.insert(FixtureResult::recognized("id", long));
        let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
        assert_eq!(result.text().len(), crate::engine::MAX_CHAR_COUNT);
    }

    #[test]
    fn unbounded_backend_keeps_long_text() {
        let engine = engine();
        let long = "b".repeat(4096);
        let handle = engine.insert(FixtureResult::recognized("id", long.clone()));
        let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
        assert_eq!(result.text(), long);
    }

    // --- properties and guarded details ---

    #[test]
    fn missing_error_details_property_is_empty() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
        let details = result
            .properties()
            .get_property(PropertyId::SpeechServiceResponseJsonErrorDetails)
            .unwrap();
        assert_eq!(details, "");
    }

    #[test]
    fn guarded_details_follow_reason() {
        let engine = engine();
        let canceled = engine.insert(FixtureResult::canceled(
            "c",
            CancellationReason::Error,
            CancellationErrorCode::Forbidden,
            None,
        ));
        let no_match = engine.insert(FixtureResult::no_match("n", NoMatchReason::NotRecognized));

        let canceled = RecognitionResult::from_handle(engine.clone(), canceled).unwrap();
        let no_match = RecognitionResult::from_handle(engine.clone(), no_match).unwrap();

        assert!(canceled.cancellation_details().unwrap().is_some());
        assert!(canceled.no_match_details().unwrap().is_none());
        assert!(no_match.no_match_details().unwrap().is_some());
        assert!(no_match.cancellation_details().unwrap().is_none());
    }

    #[test]
    fn guarded_details_skip_engine_on_mismatch() {
        let engine = engine();
        let handle = engine.insert(hello_world());
        let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();

        engine.fail_on(EngineCall::CancellationReason, status::RUNTIME_ERROR);
        engine.fail_on(EngineCall::NoMatchReason, status::RUNTIME_ERROR);
        assert!(result.cancellation_details().unwrap().is_none());
        assert!(result.no_match_details().unwrap().is_none());
    }
}
