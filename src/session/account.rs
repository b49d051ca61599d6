use serde::Deserialize;
use std::sync::Arc;

use super::profile::{Profile, ProfilePatch, ProfileSettings};
use super::{Identity, Session};
use crate::backend::StudyBackend;
use crate::error::{StudyError, StudyResult};
use crate::speech::Speed;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn require(fields: &[&str], message: &str) -> StudyResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(StudyError::Validation(message.to_string()));
    }
    Ok(())
}

/// Account operations. Each one mutates the caller's `Session` and writes
/// identity changes through to the local store.
pub struct AccountService {
    backend: Arc<dyn StudyBackend>,
    store: Arc<dyn KeyValueStore>,
}

impl AccountService {
    pub fn new(backend: Arc<dyn StudyBackend>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { backend, store }
    }

    pub async fn login(&self, session: &mut Session, credentials: &Credentials) -> StudyResult<()> {
        require(
            &[&credentials.username, &credentials.password],
            "Please enter username and password.",
        )?;

        let resp = self
            .backend
            .login(credentials.username.trim(), &credentials.password)
            .await?;
        tracing::info!(
            "[Session] Logged in as {} (ai: {}, groq: {}, elevenlabs: {})",
            resp.user.username,
            resp.profile.can_use_ai,
            resp.profile.has_groq_key,
            resp.profile.has_elevenlabs_key
        );

        session.establish(
            Identity {
                token: resp.token,
                user: resp.user,
                profile: resp.profile,
            },
            self.store.as_ref(),
        )
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, registration: &Registration) -> StudyResult<()> {
        require(
            &[
                &registration.username,
                &registration.email,
                &registration.password,
            ],
            "Please fill in username, email and password.",
        )?;

        self.backend
            .register(
                registration.username.trim(),
                registration.email.trim(),
                &registration.password,
            )
            .await?;
        tracing::info!("[Session] Registered {}", registration.username.trim());
        Ok(())
    }

    pub fn logout(&self, session: &mut Session) -> StudyResult<()> {
        tracing::info!("[Session] Logging out {}", session.display_name());
        session.clear(self.store.as_ref())
    }

    /// Fetch the profile fresh from the backend and cache it.
    pub async fn load_profile(&self, session: &mut Session) -> StudyResult<Profile> {
        let token = session.token().ok_or(StudyError::NotAuthenticated)?.to_string();
        let resp = self.backend.get_profile(&token).await?;
        session.replace_profile(resp.profile.clone(), self.store.as_ref())?;
        tracing::info!(
            "[Session] Profile loaded (google: {}, groq: {}, elevenlabs: {})",
            resp.profile.has_google_key,
            resp.profile.has_groq_key,
            resp.profile.has_elevenlabs_key
        );
        Ok(resp.profile)
    }

    /// Send the present settings and merge the returned partial profile.
    pub async fn update_preferences(
        &self,
        session: &mut Session,
        settings: &ProfileSettings,
    ) -> StudyResult<Profile> {
        let token = session.token().ok_or(StudyError::NotAuthenticated)?.to_string();
        if settings.is_empty() {
            return Err(StudyError::Validation("No settings to save.".to_string()));
        }

        let patch = self.backend.put_profile(&token, settings).await?;
        session.merge_profile(&patch, self.store.as_ref())?;
        tracing::info!("[Session] Settings saved");
        session.profile().cloned().ok_or(StudyError::NotAuthenticated)
    }

    /// Best effort: persist the last chosen speed. Never fails the caller.
    pub async fn remember_speed(&self, session: &mut Session, speed: Speed) {
        if let Some(patch) = self.send_speed(session, speed).await {
            self.apply_speed(session, &patch);
        }
    }

    /// PUT the chosen speed using a snapshot of `session`. Returns the
    /// backend's partial profile, or `None` for guests, an unchanged speed,
    /// or a failed request.
    pub async fn send_speed(&self, session: &Session, speed: Speed) -> Option<SpeedUpdate> {
        let token = session.token()?;
        if session.preferences().voice_speed == speed {
            return None;
        }
        match self
            .backend
            .put_profile(token, &ProfileSettings::voice_speed(speed))
            .await
        {
            Ok(patch) => Some(SpeedUpdate {
                token: token.to_string(),
                patch,
            }),
            Err(e) => {
                tracing::warn!("[Session] Could not remember voice speed {}: {}", speed, e);
                None
            }
        }
    }

    /// Merge a finished speed update, unless the session changed hands meanwhile.
    pub fn apply_speed(&self, session: &mut Session, update: &SpeedUpdate) {
        if session.token() != Some(update.token.as_str()) {
            tracing::debug!("[Session] Dropping speed update for a stale session");
            return;
        }
        if let Err(e) = session.merge_profile(&update.patch, self.store.as_ref()) {
            tracing::warn!("[Session] Could not cache voice speed: {}", e);
        }
    }
}

/// Result of a speed PUT, tagged with the token it was sent under.
#[derive(Debug, Clone)]
pub struct SpeedUpdate {
    token: String,
    patch: ProfilePatch,
}
