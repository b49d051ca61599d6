//! Which service handled the latest translate/speak, for display only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::{Session, TranslationPreference, TtsPreference};
use crate::speech::Speed;

// ── Service Choice ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceChoice {
    GoogleOfficial,
    Google,
    GoogleCloud,
    Groq,
    Elevenlabs,
    /// Host native speech synthesis.
    Browser,
    /// Offline dictionary.
    Basic,
    Other(String),
}

impl ServiceChoice {
    pub fn tag(&self) -> &str {
        match self {
            ServiceChoice::GoogleOfficial => "google_official",
            ServiceChoice::Google => "google",
            ServiceChoice::GoogleCloud => "google_cloud",
            ServiceChoice::Groq => "groq",
            ServiceChoice::Elevenlabs => "elevenlabs",
            ServiceChoice::Browser => "browser",
            ServiceChoice::Basic => "basic",
            ServiceChoice::Other(tag) => tag,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ServiceChoice::GoogleOfficial => "Google Official",
            ServiceChoice::Google => "Google Free",
            ServiceChoice::GoogleCloud => "Google Cloud TTS",
            ServiceChoice::Groq => "Groq AI",
            ServiceChoice::Elevenlabs => "ElevenLabs",
            ServiceChoice::Browser => "Browser TTS",
            ServiceChoice::Basic => "Basic Dictionary",
            ServiceChoice::Other(tag) => tag,
        }
    }

    /// True for tiers that ran on this device.
    pub fn is_local(&self) -> bool {
        matches!(self, ServiceChoice::Browser | ServiceChoice::Basic)
    }
}

impl From<String> for ServiceChoice {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "google_official" => ServiceChoice::GoogleOfficial,
            "google" => ServiceChoice::Google,
            "google_cloud" => ServiceChoice::GoogleCloud,
            "groq" => ServiceChoice::Groq,
            "elevenlabs" => ServiceChoice::Elevenlabs,
            "browser" => ServiceChoice::Browser,
            "basic" => ServiceChoice::Basic,
            _ => ServiceChoice::Other(tag),
        }
    }
}

impl From<&str> for ServiceChoice {
    fn from(tag: &str) -> Self {
        ServiceChoice::from(tag.to_string())
    }
}

impl From<ServiceChoice> for String {
    fn from(choice: ServiceChoice) -> String {
        choice.tag().to_string()
    }
}

impl fmt::Display for ServiceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Status Board ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Translation,
    Speech,
}

/// Labels shown in the status bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub translation: String,
    pub tts: String,
    pub active_speed: Speed,
}

impl ServiceStatus {
    /// Expected services before any action has run, derived from the session profile.
    pub fn for_session(session: &Session) -> Self {
        let Some(profile) = session.profile() else {
            return Self {
                translation: "Google Free".to_string(),
                tts: "Google TTS".to_string(),
                active_speed: Speed::Normal,
            };
        };

        let translation = match profile.preferred_translation_service {
            TranslationPreference::Google if profile.has_google_key => "Google Official",
            TranslationPreference::Groq if profile.has_groq_key => "Groq AI",
            _ if profile.has_google_key || profile.has_groq_key => "Auto (AI)",
            _ => "Google Free",
        };

        let tts = match profile.preferred_tts_service {
            TtsPreference::Elevenlabs if profile.has_elevenlabs_key => "ElevenLabs",
            TtsPreference::GoogleCloud if profile.has_google_tts_key => "Google Cloud TTS",
            TtsPreference::Google => "Google TTS (Free)",
            _ => "Browser TTS",
        };

        Self {
            translation: translation.to_string(),
            tts: tts.to_string(),
            active_speed: profile.preferred_voice_speed,
        }
    }

    /// Replace the label for `kind` with the service that actually answered.
    pub fn record(&mut self, kind: ActionKind, choice: &ServiceChoice) {
        let label = choice.label().to_string();
        match kind {
            ActionKind::Translation => self.translation = label,
            ActionKind::Speech => self.tts = label,
        }
    }
}
