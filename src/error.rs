use serde::Serialize;
use thiserror::Error;

// ── Error Types ────────────────────────────────────────

#[derive(Debug, Clone, Error, Serialize, PartialEq)]
pub enum StudyError {
    /// Transport-level failure talking to the backend.
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The backend answered, but with an error or `success: false`.
    #[error("Remote service rejected the request: {message}")]
    RemoteRejected {
        status: Option<u16>,
        message: String,
    },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("This device does not support speech playback.")]
    LocalCapabilityMissing,

    #[error("Speech playback failed: {0}")]
    Playback(String),

    #[error("{0}")]
    Validation(String),

    #[error("Local storage error: {0}")]
    Persistence(String),

    #[error("Login required")]
    NotAuthenticated,

    #[error("Config error: {0}")]
    Config(String),
}

impl StudyError {
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        StudyError::RemoteRejected {
            status,
            message: message.into(),
        }
    }

    /// Whether a resolution chain may move on to its next tier after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StudyError::RemoteUnavailable(_)
                | StudyError::RemoteRejected { .. }
                | StudyError::Timeout(_)
                | StudyError::Playback(_)
        )
    }
}

impl From<reqwest::Error> for StudyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StudyError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            StudyError::rejected(Some(status.as_u16()), err.to_string())
        } else {
            StudyError::RemoteUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StudyError {
    fn from(err: serde_json::Error) -> Self {
        StudyError::Persistence(format!("Serialization error: {}", err))
    }
}

impl From<std::io::Error> for StudyError {
    fn from(err: std::io::Error) -> Self {
        StudyError::Persistence(err.to_string())
    }
}

// For presentation-layer return compatibility
impl From<StudyError> for String {
    fn from(e: StudyError) -> String {
        e.to_string()
    }
}

pub type StudyResult<T> = Result<T, StudyError>;
