use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StudyError, StudyResult};

// ── Speed ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Fast, Speed::Normal, Speed::Slow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Normal => "normal",
            Speed::Slow => "slow",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Speed {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Speed::Fast),
            "normal" => Ok(Speed::Normal),
            "slow" => Ok(Speed::Slow),
            other => Err(StudyError::Validation(format!("Unknown speed: {}", other))),
        }
    }
}

// ── Playback Payloads ──────────────────────────────────

/// Decoded audio returned by a remote synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// A request for the host's native speech synthesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, lang: impl Into<String>, rate: f32) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
            rate,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

// ── Output Trait ───────────────────────────────────────

/// Host-side audio. Both async methods resolve when playback has finished.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Play a decoded clip at `rate` (1.0 = as recorded).
    async fn play_audio(&self, clip: AudioClip, rate: f32) -> StudyResult<()>;

    /// Whether the host has a native speech synthesizer at all.
    fn native_available(&self) -> bool;

    /// Speak with the native synthesizer. Any in-progress native speech is cancelled first.
    async fn speak_native(&self, utterance: Utterance) -> StudyResult<()>;
}
