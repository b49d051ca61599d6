//! `StudyConfig`: JSON file under the app data dir, defaults for anything missing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{StudyError, StudyResult};
use crate::speech::Speed;

pub const APP_DIR: &str = "english-study";
pub const API_URL_ENV: &str = "ENGLISH_STUDY_API_URL";

/// Resolve the backend URL: a non-empty environment override wins over the configured value.
pub fn resolve_api_url(configured: &str, env_var: &str) -> String {
    match std::env::var(env_var) {
        Ok(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => configured.trim_end_matches('/').to_string(),
    }
}

/// Application data directory (`<data_dir>/english-study`).
pub fn app_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

// ── Rate Tables ────────────────────────────────────────

/// Speed tag → rate multiplier. Remote audio and native synthesis each get their own table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub fast: f32,
    pub normal: f32,
    pub slow: f32,
}

impl RateTable {
    pub fn rate_for(&self, speed: Speed) -> f32 {
        match speed {
            Speed::Fast => self.fast,
            Speed::Normal => self.normal,
            Speed::Slow => self.slow,
        }
    }

    pub fn playback_default() -> Self {
        Self {
            fast: 1.3,
            normal: 1.0,
            slow: 0.8,
        }
    }

    pub fn native_default() -> Self {
        Self {
            fast: 1.3,
            normal: 0.9,
            slow: 0.6,
        }
    }
}

fn default_playback_rates() -> RateTable {
    RateTable::playback_default()
}
fn default_native_rates() -> RateTable {
    RateTable::native_default()
}
fn default_api_base_url() -> String {
    "http://localhost:8002/api".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_playback_timeout_secs() -> u64 {
    120
}
fn default_history_limit() -> usize {
    50
}
fn default_native_lang() -> String {
    "en-US".to_string()
}

// ── Top-Level Config ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound on a single audio playback or native utterance.
    #[serde(default = "default_playback_timeout_secs")]
    pub playback_timeout_secs: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Local key-value file. `None` → `<app_data_dir>/local_storage.json`.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    #[serde(default = "default_playback_rates")]
    pub playback_rates: RateTable,
    #[serde(default = "default_native_rates")]
    pub native_rates: RateTable,
    #[serde(default = "default_native_lang")]
    pub native_lang: String,
    /// Extra dictionary entries; these win over the built-in table.
    #[serde(default)]
    pub dictionary_overrides: HashMap<String, String>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            playback_timeout_secs: default_playback_timeout_secs(),
            history_limit: default_history_limit(),
            storage_path: None,
            playback_rates: RateTable::playback_default(),
            native_rates: RateTable::native_default(),
            native_lang: default_native_lang(),
            dictionary_overrides: HashMap::new(),
        }
    }
}

impl StudyConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn playback_timeout(&self) -> Duration {
        Duration::from_secs(self.playback_timeout_secs)
    }

    pub fn api_url(&self) -> String {
        resolve_api_url(&self.api_base_url, API_URL_ENV)
    }

    pub fn storage_file(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(|| app_data_dir().join("local_storage.json"))
    }

    /// Read `path`. A missing or unreadable file means defaults; the app
    /// must start either way.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::info!("[Config] No config at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => {
                tracing::info!(
                    "[Config] Loaded {} (history limit {}, {} dictionary override(s))",
                    path.display(),
                    config.history_limit,
                    config.dictionary_overrides.len()
                );
                config
            }
            Err(e) => {
                tracing::warn!("[Config] Ignoring invalid {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from `<app_data_dir>/config.json`.
    pub fn load_default() -> Self {
        Self::load(&default_config_path())
    }

    pub fn save(&self, path: &Path) -> StudyResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                StudyError::Persistence(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .map_err(|e| StudyError::Persistence(format!("cannot write {}: {}", path.display(), e)))?;
        tracing::info!("[Config] Saved {}", path.display());
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    app_data_dir().join("config.json")
}
