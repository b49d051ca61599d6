use serde::{Deserialize, Serialize};

use crate::speech::Speed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationPreference {
    #[default]
    Auto,
    Groq,
    Google,
    Basic,
}

impl TranslationPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationPreference::Auto => "auto",
            TranslationPreference::Groq => "groq",
            TranslationPreference::Google => "google",
            TranslationPreference::Basic => "basic",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsPreference {
    Browser,
    #[default]
    Google,
    GoogleCloud,
    Elevenlabs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Per-account preferences and key presence flags. Raw API keys never land here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub can_use_ai: bool,
    pub has_elevenlabs_key: bool,
    pub has_groq_key: bool,
    pub has_google_key: bool,
    pub has_google_tts_key: bool,
    pub preferred_voice_speed: Speed,
    pub preferred_tts_service: TtsPreference,
    pub preferred_translation_service: TranslationPreference,
    pub daily_usage: u64,
    pub total_usage: u64,
}

/// Partial profile as returned by a settings update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    pub can_use_ai: Option<bool>,
    pub has_elevenlabs_key: Option<bool>,
    pub has_groq_key: Option<bool>,
    pub has_google_key: Option<bool>,
    pub has_google_tts_key: Option<bool>,
    pub preferred_voice_speed: Option<Speed>,
    pub preferred_tts_service: Option<TtsPreference>,
    pub preferred_translation_service: Option<TranslationPreference>,
    pub daily_usage: Option<u64>,
    pub total_usage: Option<u64>,
}

impl Profile {
    pub fn merge(&mut self, patch: &ProfilePatch) {
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(v) = patch.$field { self.$field = v; })*
            };
        }
        apply!(
            can_use_ai,
            has_elevenlabs_key,
            has_groq_key,
            has_google_key,
            has_google_tts_key,
            preferred_voice_speed,
            preferred_tts_service,
            preferred_translation_service,
            daily_usage,
            total_usage
        );
    }
}

/// Settings form sent with a profile update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevenlabs_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_translate_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_tts_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_tts_service: Option<TtsPreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_voice_speed: Option<Speed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_translation_service: Option<TranslationPreference>,
}

impl ProfileSettings {
    pub fn voice_speed(speed: Speed) -> Self {
        Self {
            preferred_voice_speed: Some(speed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
