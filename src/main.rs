//! Command-line entry point — speech-result.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Load the JSON result fixture named on the command line.
//! 4. Register every fixture with an [`InMemoryEngine`].
//! 5. Build a [`RecognitionResult`] per handle and print its summary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use speech_result::{
    config::AppConfig,
    engine::{InMemoryEngine, ResultEngine},
    fixture::load_fixtures,
    report::{render, ResultSummary},
    result::RecognitionResult,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(fixture_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: speech-result <results.json>");
    };

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let fixtures = load_fixtures(&fixture_path)?;
    log::info!(
        "loaded {} result(s) from {}",
        fixtures.len(),
        fixture_path.display()
    );

    let engine = match config.engine.max_string_len {
        Some(limit) => InMemoryEngine::new().with_string_limit(limit),
        None => InMemoryEngine::new(),
    };
    let engine = Arc::new(engine);
    let handles: Vec<_> = fixtures.into_iter().map(|f| engine.insert(f)).collect();

    let dyn_engine: Arc<dyn ResultEngine> = engine.clone();
    let mut summaries = Vec::with_capacity(handles.len());
    for handle in handles {
        let raw = handle.as_raw();
        let result = RecognitionResult::from_handle(Arc::clone(&dyn_engine), handle)
            .with_context(|| format!("failed to read result handle {raw}"))?;
        summaries.push(ResultSummary::from_result(&result, &config.output)?);
    }

    println!("{}", render(&summaries, config.output.format)?);

    if engine.live_results() != 0 || engine.live_property_bags() != 0 {
        log::warn!(
            "engine still holds {} result(s) and {} property bag(s)",
            engine.live_results(),
            engine.live_property_bags()
        );
    }
    Ok(())
}
