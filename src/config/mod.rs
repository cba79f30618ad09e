//! Configuration module for speech-result.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the engine and
//! the output renderer, `AppPaths` for the platform config directory, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, EngineConfig, OutputConfig, OutputFormat};
