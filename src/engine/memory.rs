//! In-process [`ResultEngine`] backed by a handle table.
//!
//! Results are inserted from [`FixtureResult`]s and handed out as opaque
//! [`ResultHandle`]s.  The engine keeps per-handle release counts and supports
//! fault injection, which makes it the reference backend for tests and for the
//! `speech-result` CLI.  Entries are never removed, see [`InMemoryEngine`].
//!
//! ```rust
//! use std::sync::Arc;
//! use speech_result::engine::InMemoryEngine;
//! use speech_result::fixture::FixtureResult;
//! use speech_result::result::RecognitionResult;
//!
//! let engine = Arc::new(InMemoryEngine::new());
//! let handle = engine.insert(FixtureResult::recognized("abc123", "hello world"));
//! let result = RecognitionResult::from_handle(engine.clone(), handle).unwrap();
//! assert_eq!(result.text(), "hello world");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::engine::{
    status, EngineCall, EngineError, PropertyBagHandle, ResultEngine, ResultHandle,
};
use crate::fixture::FixtureResult;
use crate::result::{CancellationErrorCode, CancellationReason, NoMatchReason, ResultReason};

struct ResultEntry {
    fixture: FixtureResult,
    released: bool,
    release_calls: u32,
}

struct BagEntry {
    properties: BTreeMap<String, String>,
    released: bool,
    release_calls: u32,
}

#[derive(Default)]
struct Table {
    next_handle: u64,
    results: HashMap<u64, ResultEntry>,
    bags: HashMap<u64, BagEntry>,
    faults: HashMap<EngineCall, u32>,
}

impl Table {
    fn mint(&mut self) -> u64 {
        // 0 is reserved as the invalid handle.
        self.next_handle += 1;
        self.next_handle
    }

    fn check_fault(&self, call: EngineCall) -> Result<(), EngineError> {
        match self.faults.get(&call) {
            Some(&code) => {
                log::debug!("in-memory engine: injected fault on {call} (status {code:#x})");
                Err(EngineError::new(call, code))
            }
            None => Ok(()),
        }
    }

    fn live_result(&self, call: EngineCall, handle: &ResultHandle) -> Result<&FixtureResult, EngineError> {
        self.check_fault(call)?;
        match self.results.get(&handle.as_raw()) {
            Some(entry) if !entry.released => Ok(&entry.fixture),
            _ => Err(EngineError::new(call, status::INVALID_HANDLE)),
        }
    }
}

/// Thread-safe in-memory recognition engine.
///
/// Released results and bags stay in the table, marked released, so their
/// release counts remain queryable.  The table therefore only grows; create
/// one engine per fixture set rather than one per process.
#[derive(Default)]
pub struct InMemoryEngine {
    table: Mutex<Table>,
    string_limit: Option<usize>,
}

impl std::fmt::Debug for InMemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEngine")
            .field("string_limit", &self.string_limit)
            .finish_non_exhaustive()
    }
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Truncate id and text reads to at most `limit` characters, the way a
    /// backend reading through a fixed buffer would.
    pub fn with_string_limit(mut self, limit: usize) -> Self {
        self.string_limit = Some(limit);
        self
    }

    /// Register a result and return the handle that names it.
    pub fn insert(&self, fixture: FixtureResult) -> ResultHandle {
        let mut table = self.lock();
        let raw = table.mint();
        table.results.insert(
            raw,
            ResultEntry {
                fixture,
                released: false,
                release_calls: 0,
            },
        );
        ResultHandle::from_raw(raw)
    }

    /// Make every subsequent `call` fail with `code` until [`clear_faults`].
    ///
    /// [`clear_faults`]: InMemoryEngine::clear_faults
    pub fn fail_on(&self, call: EngineCall, code: u32) {
        self.lock().faults.insert(call, code);
    }

    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// Number of `release_result` calls received for the handle whose raw
    /// value is `raw`.
    pub fn release_count(&self, raw: u64) -> u32 {
        self.lock()
            .results
            .get(&raw)
            .map_or(0, |e| e.release_calls)
    }

    /// Number of `release_property_bag` calls received for the bag whose raw
    /// value is `raw`.
    pub fn bag_release_count(&self, raw: u64) -> u32 {
        self.lock()
            .bags
            .get(&raw)
            .map_or(0, |e| e.release_calls)
    }

    /// Results inserted and not yet released.
    pub fn live_results(&self) -> usize {
        self.lock().results.values().filter(|e| !e.released).count()
    }

    /// Property bags acquired and not yet released.
    pub fn live_property_bags(&self) -> usize {
        self.lock().bags.values().filter(|e| !e.released).count()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // Poisoning is ignored: every table update is a single insert or flag flip.
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bounded(&self, s: &str) -> String {
        match self.string_limit {
            Some(limit) => truncate_chars(s, limit).to_string(),
            None => s.to_string(),
        }
    }
}

/// Longest prefix of `s` holding at most `max_chars` characters.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl ResultEngine for InMemoryEngine {
    fn result_id(&self, handle: &ResultHandle) -> Result<String, EngineError> {
        let table = self.lock();
        let r = table.live_result(EngineCall::ResultId, handle)?;
        Ok(self.bounded(&r.id))
    }

    fn reason(&self, handle: &ResultHandle) -> Result<ResultReason, EngineError> {
        let table = self.lock();
        Ok(table.live_result(EngineCall::Reason, handle)?.reason)
    }

    fn text(&self, handle: &ResultHandle) -> Result<String, EngineError> {
        let table = self.lock();
        let r = table.live_result(EngineCall::Text, handle)?;
        Ok(self.bounded(&r.text))
    }

    fn offset(&self, handle: &ResultHandle) -> Result<u64, EngineError> {
        let table = self.lock();
        Ok(table.live_result(EngineCall::Offset, handle)?.offset)
    }

    fn duration(&self, handle: &ResultHandle) -> Result<u64, EngineError> {
        let table = self.lock();
        Ok(table.live_result(EngineCall::Duration, handle)?.duration)
    }

    fn property_bag(&self, handle: &ResultHandle) -> Result<PropertyBagHandle, EngineError> {
        let mut table = self.lock();
        let properties = table
            .live_result(EngineCall::PropertyBag, handle)?
            .properties
            .clone();
        let raw = table.mint();
        table.bags.insert(
            raw,
            BagEntry {
                properties,
                released: false,
                release_calls: 0,
            },
        );
        Ok(PropertyBagHandle::from_raw(raw))
    }

    fn property(&self, bag: &PropertyBagHandle, name: &str) -> Result<Option<String>, EngineError> {
        let table = self.lock();
        table.check_fault(EngineCall::Property)?;
        match table.bags.get(&bag.as_raw()) {
            Some(entry) if !entry.released => Ok(entry.properties.get(name).cloned()),
            _ => Err(EngineError::new(EngineCall::Property, status::INVALID_HANDLE)),
        }
    }

    fn cancellation_reason(&self, handle: &ResultHandle) -> Result<CancellationReason, EngineError> {
        let table = self.lock();
        Ok(table
            .live_result(EngineCall::CancellationReason, handle)?
            .cancellation
            .reason)
    }

    fn cancellation_error_code(
        &self,
        handle: &ResultHandle,
    ) -> Result<CancellationErrorCode, EngineError> {
        let table = self.lock();
        Ok(table
            .live_result(EngineCall::CancellationErrorCode, handle)?
            .cancellation
            .error_code)
    }

    fn no_match_reason(&self, handle: &ResultHandle) -> Result<NoMatchReason, EngineError> {
        let table = self.lock();
        Ok(table
            .live_result(EngineCall::NoMatchReason, handle)?
            .no_match_reason)
    }

    fn release_result(&self, handle: ResultHandle) -> Result<(), EngineError> {
        let mut table = self.lock();
        table.check_fault(EngineCall::ReleaseResult)?;
        match table.results.get_mut(&handle.as_raw()) {
            Some(entry) => {
                entry.release_calls += 1;
                entry.released = true;
                Ok(())
            }
            None => Err(EngineError::new(EngineCall::ReleaseResult, status::INVALID_HANDLE)),
        }
    }

    fn release_property_bag(&self, bag: PropertyBagHandle) -> Result<(), EngineError> {
        let mut table = self.lock();
        table.check_fault(EngineCall::ReleasePropertyBag)?;
        match table.bags.get_mut(&bag.as_raw()) {
            Some(entry) => {
                entry.release_calls += 1;
                entry.released = true;
                Ok(())
            }
            None => Err(EngineError::new(
                EngineCall::ReleasePropertyBag,
                status::INVALID_HANDLE,
            )),
        }
    }
}
