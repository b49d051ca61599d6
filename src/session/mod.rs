//! Who is using the app, and with which preferences.
//!
//! A `Session` is an explicit value owned by the caller and passed into every
//! operation that needs it. It changes only through `establish`, `clear` and
//! `merge_profile`, each of which writes through to the local store.

pub mod account;
pub mod profile;

pub use account::{AccountService, Credentials, Registration, SpeedUpdate};
pub use profile::{
    Profile, ProfilePatch, ProfileSettings, TranslationPreference, TtsPreference, UserInfo,
};

use serde::{Deserialize, Serialize};

use crate::error::StudyResult;
use crate::speech::Speed;
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};

/// Authenticated identity: credential plus cached account data.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub token: String,
    pub user: UserInfo,
    pub profile: Profile,
}

/// Shape persisted under `currentUser`: the user object with its profile nested inside.
#[derive(Serialize, Deserialize)]
struct StoredUser {
    #[serde(flatten)]
    user: UserInfo,
    #[serde(default)]
    profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub translation_service: TranslationPreference,
    pub tts_service: TtsPreference,
    pub voice_speed: Speed,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            translation_service: TranslationPreference::Auto,
            tts_service: TtsPreference::Google,
            voice_speed: Speed::Normal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn guest() -> Self {
        Self { identity: None }
    }

    /// Rebuild the session persisted by a previous run. Anything missing or
    /// unreadable yields a guest session.
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let token = match store.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return Self::guest(),
            Err(e) => {
                tracing::warn!("[Session] Could not read stored token: {}", e);
                return Self::guest();
            }
        };

        let stored = match store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::guest(),
            Err(e) => {
                tracing::warn!("[Session] Could not read stored user: {}", e);
                return Self::guest();
            }
        };

        match serde_json::from_str::<StoredUser>(&stored) {
            Ok(StoredUser { user, profile }) => {
                tracing::info!("[Session] Restored session for {}", user.username);
                Self {
                    identity: Some(Identity {
                        token,
                        user,
                        profile,
                    }),
                }
            }
            Err(e) => {
                tracing::warn!("[Session] Stored user is corrupt ({}), continuing as guest", e);
                Self::guest()
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.token.as_str())
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.identity.as_ref().map(|i| &i.user)
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.identity.as_ref().map(|i| &i.profile)
    }

    pub(crate) fn profile_mut(&mut self) -> Option<&mut Profile> {
        self.identity.as_mut().map(|i| &mut i.profile)
    }

    pub fn preferences(&self) -> Preferences {
        match self.profile() {
            Some(p) => Preferences {
                translation_service: p.preferred_translation_service,
                tts_service: p.preferred_tts_service,
                voice_speed: p.preferred_voice_speed,
            },
            None => Preferences::default(),
        }
    }

    /// Display name for logs.
    pub fn display_name(&self) -> &str {
        self.user().map(|u| u.username.as_str()).unwrap_or("guest")
    }

    /// Become `identity` and persist it.
    pub fn establish(&mut self, identity: Identity, store: &dyn KeyValueStore) -> StudyResult<()> {
        store.set(TOKEN_KEY, &identity.token)?;
        store.set(USER_KEY, &stored_user_json(&identity)?)?;
        self.identity = Some(identity);
        Ok(())
    }

    /// Drop the identity and its persisted copy.
    pub fn clear(&mut self, store: &dyn KeyValueStore) -> StudyResult<()> {
        self.identity = None;
        store.remove(TOKEN_KEY)?;
        store.remove(USER_KEY)?;
        Ok(())
    }

    /// Apply a partial profile from the backend. No-op for guests.
    pub fn merge_profile(
        &mut self,
        patch: &ProfilePatch,
        store: &dyn KeyValueStore,
    ) -> StudyResult<()> {
        let Some(identity) = self.identity.as_mut() else {
            return Ok(());
        };
        identity.profile.merge(patch);
        store.set(USER_KEY, &stored_user_json(identity)?)?;
        Ok(())
    }

    /// Replace the cached profile wholesale (fresh fetch).
    pub fn replace_profile(&mut self, profile: Profile, store: &dyn KeyValueStore) -> StudyResult<()> {
        let Some(identity) = self.identity.as_mut() else {
            return Ok(());
        };
        identity.profile = profile;
        store.set(USER_KEY, &stored_user_json(identity)?)?;
        Ok(())
    }
}

fn stored_user_json(identity: &Identity) -> StudyResult<String> {
    let stored = StoredUser {
        user: identity.user.clone(),
        profile: identity.profile.clone(),
    };
    Ok(serde_json::to_string(&stored)?)
}
