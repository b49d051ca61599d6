//! Request and response bodies exchanged with the study backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::{RecordId, StudyRecord};
use crate::session::{Profile, ProfilePatch, TranslationPreference, UserInfo};
use crate::speech::Speed;

/// `service` value asking the backend to pick by account preference.
pub const AUTO_SERVICE: &str = "auto";

// ── Requests ───────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct TranslateRequest<'a> {
    pub text: &'a str,
    pub service: TranslationPreference,
}

#[derive(Debug, Serialize)]
pub(crate) struct SynthesizeRequest<'a> {
    pub text: &'a str,
    pub speed: Speed,
    pub service: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveRequest<'a> {
    pub text: &'a str,
    pub translation: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteSelectedRequest {
    /// Ids travel as strings, matching what the history list hands out.
    pub item_ids: Vec<String>,
}

// ── Responses ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesizeResponse {
    #[serde(default)]
    pub success: bool,
    /// Base64-encoded audio.
    #[serde(default)]
    pub audio_data: Option<String>,
    #[serde(default)]
    pub use_browser_tts: bool,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub user: Option<UserInfo>,
    pub profile: Profile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProfileUpdateResponse {
    #[serde(default)]
    pub profile: ProfilePatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub item_id: Option<RecordId>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub history: Vec<RemoteHistoryItem>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DeleteResponse {
    #[serde(default)]
    pub deleted_count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One history row as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RemoteHistoryItem {
    pub id: RecordId,
    #[serde(alias = "english_text")]
    pub text: String,
    #[serde(default, alias = "korean_translation")]
    pub translation: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tts_service: Option<String>,
    #[serde(default)]
    pub voice_speed: Option<String>,
    #[serde(default)]
    pub accessed_count: Option<u32>,
}

const REMOTE_DATE_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

impl From<RemoteHistoryItem> for StudyRecord {
    fn from(item: RemoteHistoryItem) -> Self {
        let created_at = item
            .created_at
            .or_else(|| {
                item.date.as_deref().and_then(|d| {
                    NaiveDateTime::parse_from_str(d, REMOTE_DATE_FORMAT)
                        .ok()
                        .map(|naive| naive.and_utc())
                })
            })
            .or_else(|| item.id.as_timestamp().and_then(DateTime::from_timestamp_millis))
            .unwrap_or_else(Utc::now);

        StudyRecord {
            id: item.id,
            text: item.text,
            translation: item.translation,
            created_at,
            tts_service: item.tts_service.filter(|s| !s.is_empty()),
            voice_speed: item.voice_speed.and_then(|s| s.parse().ok()),
            accessed_count: item.accessed_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn remote_item_date_is_parsed() {
        let item: RemoteHistoryItem = serde_json::from_value(serde_json::json!({
            "id": 1700000000000i64,
            "text": "good morning",
            "translation": "",
            "date": "03/14/2024, 09:26:53 PM",
            "tts_service": "",
            "voice_speed": "slow",
            "accessed_count": 3
        }))
        .unwrap();
        let record = StudyRecord::from(item);

        assert_eq!(record.created_at.year(), 2024);
        assert_eq!(record.created_at.hour(), 21);
        assert_eq!(record.voice_speed, Some(Speed::Slow));
        assert_eq!(record.tts_service, None);
        assert_eq!(record.accessed_count, Some(3));
    }

    #[test]
    fn unparsable_date_falls_back_to_id_timestamp() {
        let item: RemoteHistoryItem = serde_json::from_value(serde_json::json!({
            "id": 1700000000000i64,
            "english_text": "hello",
            "date": "yesterday-ish"
        }))
        .unwrap();
        let record = StudyRecord::from(item);
        assert_eq!(record.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(record.text, "hello");
        assert!(record.translation.is_empty());
    }

    #[test]
    fn synthesize_response_defaults() {
        let resp: SynthesizeResponse =
            serde_json::from_str(r#"{ "success": true, "service": "browser", "use_browser_tts": true }"#)
                .unwrap();
        assert!(resp.use_browser_tts);
        assert!(resp.audio_data.is_none());
    }
}
