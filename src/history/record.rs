use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::speech::Speed;

/// Record identifier: a millisecond timestamp for local records, whatever the
/// backend hands out for remote ones.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Timestamp(i64),
    Opaque(String),
}

impl RecordId {
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            RecordId::Timestamp(ms) => Some(*ms),
            RecordId::Opaque(s) => s.trim().parse().ok(),
        }
    }
}

// Ids arrive from the presentation layer as text, so equality is textual.
impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordId::Timestamp(a), RecordId::Timestamp(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Timestamp(ms) => write!(f, "{}", ms),
            RecordId::Opaque(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(ms: i64) -> Self {
        RecordId::Timestamp(ms)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Opaque(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Opaque(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: RecordId,
    pub text: String,
    /// May be intentionally empty.
    #[serde(default)]
    pub translation: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_speed: Option<Speed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed_count: Option<u32>,
}

impl StudyRecord {
    pub fn local(id: i64, text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: RecordId::Timestamp(id),
            text: text.into(),
            translation: translation.into(),
            created_at: DateTime::from_timestamp_millis(id).unwrap_or_else(Utc::now),
            tts_service: None,
            voice_speed: None,
            accessed_count: None,
        }
    }

    pub fn has_translation(&self) -> bool {
        !self.translation.trim().is_empty()
    }

    /// First 50 characters of the text, with an ellipsis when cut.
    pub fn preview(&self) -> String {
        const MAX: usize = 50;
        if self.text.chars().count() > MAX {
            let head: String = self.text.chars().take(MAX).collect();
            format!("{}...", head)
        } else {
            self.text.clone()
        }
    }
}
