//! Well-known property keys and the result property collection.
//!
//! A [`PropertyCollection`] owns an engine-side property bag and releases it
//! when dropped.  Lookups of absent keys yield an empty string, never an
//! error; only a failing engine query is an error.

use std::fmt;
use std::sync::Arc;

use crate::engine::{status, EngineCall, EngineError, PropertyBagHandle, ResultEngine};

// ---------------------------------------------------------------------------
// PropertyId
// ---------------------------------------------------------------------------

/// Well-known property keys attached to recognition results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    /// Language the engine recognized against (e.g. `"en-US"`).
    SpeechServiceConnectionRecoLanguage,
    /// Raw JSON response from the speech service.
    SpeechServiceResponseJson,
    /// Raw JSON result payload.
    SpeechServiceResponseJsonResult,
    /// JSON error details for canceled results.
    SpeechServiceResponseJsonErrorDetails,
    CancellationDetailsReason,
    CancellationDetailsReasonText,
    CancellationDetailsReasonDetailedText,
    /// Raw JSON response from the language-understanding service.
    LanguageUnderstandingServiceResponseJsonResult,
}

impl PropertyId {
    /// Key under which the engine stores this property.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyId::SpeechServiceConnectionRecoLanguage => "SpeechServiceConnection_RecoLanguage",
            PropertyId::SpeechServiceResponseJson => "SpeechServiceResponse_Json",
            PropertyId::SpeechServiceResponseJsonResult => "SpeechServiceResponse_JsonResult",
            PropertyId::SpeechServiceResponseJsonErrorDetails => {
                "SpeechServiceResponse_JsonErrorDetails"
            }
            PropertyId::CancellationDetailsReason => "CancellationDetails_Reason",
            PropertyId::CancellationDetailsReasonText => "CancellationDetails_ReasonText",
            PropertyId::CancellationDetailsReasonDetailedText => {
                "CancellationDetails_ReasonDetailedText"
            }
            PropertyId::LanguageUnderstandingServiceResponseJsonResult => {
                "LanguageUnderstandingServiceResponse_JsonResult"
            }
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// PropertyCollection
// ---------------------------------------------------------------------------

/// Read-only view over a result's property bag.
pub struct PropertyCollection {
    engine: Arc<dyn ResultEngine>,
    // `Some` from construction until `drop` moves the handle into
    // `release_property_bag`.
    bag: Option<PropertyBagHandle>,
}

impl fmt::Debug for PropertyCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyCollection")
            .field("bag", &self.bag)
            .finish_non_exhaustive()
    }
}

impl PropertyCollection {
    /// Take ownership of `bag`; it is released when the collection drops.
    pub(crate) fn new(engine: Arc<dyn ResultEngine>, bag: PropertyBagHandle) -> Self {
        Self {
            engine,
            bag: Some(bag),
        }
    }

    /// Value of `id`, or an empty string when the key is absent.
    pub fn get_property(&self, id: PropertyId) -> Result<String, EngineError> {
        self.get_property_by_name(id.name())
    }

    /// Value of `id`, or `default` when the key is absent.
    pub fn get_property_or(&self, id: PropertyId, default: &str) -> Result<String, EngineError> {
        Ok(self
            .lookup(id.name())?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Value stored under an arbitrary key, or an empty string when absent.
    pub fn get_property_by_name(&self, name: &str) -> Result<String, EngineError> {
        Ok(self.lookup(name)?.unwrap_or_default())
    }

    fn lookup(&self, name: &str) -> Result<Option<String>, EngineError> {
        match &self.bag {
            Some(bag) => self.engine.property(bag, name),
            None => Err(EngineError::new(EngineCall::Property, status::INVALID_HANDLE)),
        }
    }
}

impl Drop for PropertyCollection {
    fn drop(&mut self) {
        if let Some(bag) = self.bag.take() {
            let raw = bag.as_raw();
            if let Err(e) = self.engine.release_property_bag(bag) {
                log::warn!("failed to release property bag {raw}: {e}");
            }
        }
    }
}
