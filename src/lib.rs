//! Typed, owned views over recognition results held by an external speech
//! engine.
//!
//! * [`engine`] — the engine boundary trait, opaque handles, [`engine::EngineError`].
//! * [`result`] — [`result::RecognitionResult`] and its detail views.
//! * [`fixture`] — JSON result fixtures for the in-memory engine.
//! * [`config`] — TOML-persisted application settings.
//! * [`report`] — printable result summaries.

pub mod config;
pub mod engine;
pub mod fixture;
pub mod report;
pub mod result;
