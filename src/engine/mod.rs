//! Boundary to the external recognition engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               ResultEngine (trait)                    │
//! │                                                      │
//! │   ┌──────────────┐    ┌──────────────────┐          │
//! │   │ ResultHandle │    │ PropertyBagHandle│          │
//! │   │ (opaque u64) │───▶│ (opaque u64)     │          │
//! │   └──────┬───────┘    └──────────────────┘          │
//! │          │                                           │
//! │          ▼                                           │
//! │   result_id / reason / text / offset / duration      │
//! │   cancellation_* / no_match_reason / release_*       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Every query returns `Result<_, EngineError>`; the error carries the
//! engine's status code and the [`EngineCall`] that produced it.
//!
//! [`InMemoryEngine`] is a complete in-process implementation used by the CLI
//! and by tests.

pub mod memory;

use std::fmt;

use thiserror::Error;

use crate::result::{CancellationErrorCode, CancellationReason, NoMatchReason, ResultReason};

pub use memory::InMemoryEngine;

/// Character bound of the vendor C API's string reads.
///
/// Backends that copy through a fixed buffer may truncate at this length.
/// The boundary itself carries dynamically sized strings.
pub const MAX_CHAR_COUNT: usize = 1024;

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

/// Engine status codes surfaced through [`EngineError::code`].
pub mod status {
    /// An argument was rejected by the engine.
    pub const INVALID_ARG: u32 = 0x005;
    /// The handle does not name a live engine object.
    pub const INVALID_HANDLE: u32 = 0x021;
    /// Engine-internal fault.
    pub const RUNTIME_ERROR: u32 = 0x01B;
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque identifier of an engine-side recognition result.
///
/// Handles are minted only by engine backends and are neither `Clone` nor
/// `Copy`: queries borrow a handle, [`ResultEngine::release_result`] consumes
/// it.  [`crate::result::OwnedResultHandle`] is its single owner.
///
/// ```compile_fail
/// // Handles cannot be forged outside an engine backend.
/// let forged = speech_result::engine::ResultHandle::from_raw(1);
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ResultHandle(u64);

impl ResultHandle {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw engine value, for logging and engine bookkeeping.
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Opaque identifier of an engine-side property bag.  Owned by a
/// [`crate::result::PropertyCollection`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropertyBagHandle(u64);

impl PropertyBagHandle {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// EngineCall / EngineError
// ---------------------------------------------------------------------------

/// Names the engine query that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCall {
    ResultId,
    Reason,
    Text,
    Offset,
    Duration,
    PropertyBag,
    Property,
    CancellationReason,
    CancellationErrorCode,
    NoMatchReason,
    ReleaseResult,
    ReleasePropertyBag,
}

impl EngineCall {
    /// Name of the corresponding vendor C API function.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCall::ResultId => "result_get_result_id",
            EngineCall::Reason => "result_get_reason",
            EngineCall::Text => "result_get_text",
            EngineCall::Offset => "result_get_offset",
            EngineCall::Duration => "result_get_duration",
            EngineCall::PropertyBag => "result_get_property_bag",
            EngineCall::Property => "property_bag_get_string",
            EngineCall::CancellationReason => "result_get_reason_canceled",
            EngineCall::CancellationErrorCode => "result_get_canceled_error_code",
            EngineCall::NoMatchReason => "result_get_no_match_reason",
            EngineCall::ReleaseResult => "recognizer_result_handle_release",
            EngineCall::ReleasePropertyBag => "property_bag_release",
        }
    }
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An underlying engine query reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("engine call {call} failed (status {code:#010x})")]
pub struct EngineError {
    /// The query that failed.
    pub call: EngineCall,
    /// Status code reported by the engine.
    pub code: u32,
}

impl EngineError {
    pub fn new(call: EngineCall, code: u32) -> Self {
        Self { call, code }
    }
}

// ---------------------------------------------------------------------------
// ResultEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe query interface of a recognition engine.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn ResultEngine>` by every view they hand results to.
///
/// # Contract
///
/// - Queries on a released or unknown handle fail with
///   [`status::INVALID_HANDLE`].
/// - `property` returns `Ok(None)` for an absent key; absence is not an error.
/// - `release_*` consume the handle, so each handle is released at most once.
pub trait ResultEngine: Send + Sync {
    fn result_id(&self, handle: &ResultHandle) -> Result<String, EngineError>;

    fn reason(&self, handle: &ResultHandle) -> Result<ResultReason, EngineError>;

    fn text(&self, handle: &ResultHandle) -> Result<String, EngineError>;

    /// Offset of the recognized speech, in ticks.
    fn offset(&self, handle: &ResultHandle) -> Result<u64, EngineError>;

    /// Duration of the recognized speech, in ticks.
    fn duration(&self, handle: &ResultHandle) -> Result<u64, EngineError>;

    /// Acquire the result's property bag.  The caller owns the returned handle.
    fn property_bag(&self, handle: &ResultHandle) -> Result<PropertyBagHandle, EngineError>;

    fn property(&self, bag: &PropertyBagHandle, name: &str) -> Result<Option<String>, EngineError>;

    fn cancellation_reason(&self, handle: &ResultHandle) -> Result<CancellationReason, EngineError>;

    fn cancellation_error_code(
        &self,
        handle: &ResultHandle,
    ) -> Result<CancellationErrorCode, EngineError>;

    fn no_match_reason(&self, handle: &ResultHandle) -> Result<NoMatchReason, EngineError>;

    fn release_result(&self, handle: ResultHandle) -> Result<(), EngineError>;

    fn release_property_bag(&self, bag: PropertyBagHandle) -> Result<(), EngineError>;
}

// Compile-time assertion: Box<dyn ResultEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ResultEngine>) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display_names_call_and_status() {
        let e = EngineError::new(EngineCall::Text, status::INVALID_HANDLE);
        let msg = e.to_string();
        assert!(msg.contains("result_get_text"), "{msg}");
        assert!(msg.contains("0x00000021"), "{msg}");
    }

    #[test]
    fn handles_round_trip_raw_value() {
        assert_eq!(ResultHandle::from_raw(42).as_raw(), 42);
        assert_eq!(PropertyBagHandle::from_raw(7).as_raw(), 7);
    }
}
