//! Typed views over engine-side recognition results.
//!
//! This module provides:
//! * [`RecognitionResult`] — immutable view; owns and releases its handle.
//! * [`OwnedResultHandle`] — release-once owner of a [`ResultHandle`].
//! * [`CancellationDetails`] / [`NoMatchDetails`] — derived detail views.
//! * [`PropertyCollection`] / [`PropertyId`] — result property bag access.
//! * Reason enums: [`ResultReason`], [`CancellationReason`],
//!   [`CancellationErrorCode`], [`NoMatchReason`].
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use speech_result::engine::InMemoryEngine;
//! use speech_result::fixture::FixtureResult;
//! use speech_result::result::{CancellationReason, CancellationErrorCode, RecognitionResult};
//!
//! let engine = Arc::new(InMemoryEngine::new());
//! let handle = engine.insert(FixtureResult::canceled(
//!     "c1",
//!     CancellationReason::Error,
//!     CancellationErrorCode::ConnectionFailure,
//!     Some("connection reset"),
//! ));
//!
//! let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
//! let details = result.cancellation_details().unwrap().expect("canceled");
//! assert_eq!(details.error_code(), CancellationErrorCode::ConnectionFailure);
//! assert_eq!(details.error_details(), "connection reset");
//! ```
//!
//! [`ResultHandle`]: crate::engine::ResultHandle

pub mod details;
pub mod properties;
pub mod reason;
pub mod view;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use details::{CancellationDetails, NoMatchDetails};
pub use properties::{PropertyCollection, PropertyId};
pub use reason::{CancellationErrorCode, CancellationReason, NoMatchReason, ResultReason};
pub use view::{ticks_to_duration, OwnedResultHandle, RecognitionResult, TICKS_PER_SECOND};
