//! Reason and error-code enums reported by the engine.
//!
//! Discriminants match the vendor C API so a native backend can convert with
//! [`ResultReason::from_raw`] and friends at the boundary.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ResultReason
// ---------------------------------------------------------------------------

/// Why a recognition result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultReason {
    /// Speech could not be recognized; see [`crate::result::NoMatchDetails`].
    NoMatch,
    /// Recognition was canceled; see [`crate::result::CancellationDetails`].
    Canceled,
    /// Intermediate hypothesis.
    RecognizingSpeech,
    /// Final transcription.
    RecognizedSpeech,
    RecognizingIntent,
    RecognizedIntent,
    TranslatingSpeech,
    TranslatedSpeech,
    SynthesizingAudio,
    SynthesizingAudioCompleted,
}

impl ResultReason {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::NoMatch,
            1 => Self::Canceled,
            2 => Self::RecognizingSpeech,
            3 => Self::RecognizedSpeech,
            4 => Self::RecognizingIntent,
            5 => Self::RecognizedIntent,
            6 => Self::TranslatingSpeech,
            7 => Self::TranslatedSpeech,
            8 => Self::SynthesizingAudio,
            9 => Self::SynthesizingAudioCompleted,
            _ => return None,
        })
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// `true` for final (non-intermediate) recognition outcomes.
    ///
    /// ```
    /// use speech_result::result::ResultReason;
    ///
    /// assert!(ResultReason::RecognizedSpeech.is_final());
    /// assert!(!ResultReason::RecognizingSpeech.is_final());
    /// assert!(!ResultReason::Canceled.is_final());
    /// ```
    pub fn is_final(self) -> bool {
        matches!(
            self,
            Self::RecognizedSpeech | Self::RecognizedIntent | Self::TranslatedSpeech
        )
    }
}

// ---------------------------------------------------------------------------
// CancellationReason
// ---------------------------------------------------------------------------

/// Why a result was canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancellationReason {
    /// An error occurred; the error code and details say which.
    Error = 1,
    /// The end of the audio stream was reached.
    EndOfStream = 2,
}

impl CancellationReason {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::Error),
            2 => Some(Self::EndOfStream),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

// ---------------------------------------------------------------------------
// CancellationErrorCode
// ---------------------------------------------------------------------------

/// Error code of a canceled result.  `NoError` unless the reason is `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancellationErrorCode {
    NoError,
    AuthenticationFailure,
    BadRequest,
    TooManyRequests,
    Forbidden,
    ConnectionFailure,
    ServiceTimeout,
    ServiceError,
    ServiceUnavailable,
    RuntimeError,
}

impl CancellationErrorCode {
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::NoError,
            1 => Self::AuthenticationFailure,
            2 => Self::BadRequest,
            3 => Self::TooManyRequests,
            4 => Self::Forbidden,
            5 => Self::ConnectionFailure,
            6 => Self::ServiceTimeout,
            7 => Self::ServiceError,
            8 => Self::ServiceUnavailable,
            9 => Self::RuntimeError,
            _ => return None,
        })
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl Default for CancellationErrorCode {
    fn default() -> Self {
        Self::NoError
    }
}

// ---------------------------------------------------------------------------
// NoMatchReason
// ---------------------------------------------------------------------------

/// Why speech was not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoMatchReason {
    /// Speech was detected but not recognized.
    NotRecognized = 1,
    /// The audio began with silence longer than the engine waits for.
    InitialSilenceTimeout = 2,
    /// The audio began with noise longer than the engine waits for.
    InitialBabbleTimeout = 3,
}

impl NoMatchReason {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::NotRecognized),
            2 => Some(Self::InitialSilenceTimeout),
            3 => Some(Self::InitialBabbleTimeout),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}
