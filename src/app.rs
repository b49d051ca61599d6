//! Single entry point for the presentation layer: `Intent` in, `Outcome` out.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};

use crate::backend::{HttpBackend, StudyBackend};
use crate::config::StudyConfig;
use crate::dictionary::Dictionary;
use crate::error::StudyResult;
use crate::history::{
    DeleteOutcome, HistoryStore, HistoryView, LocalHistory, RecordId, SaveOutcome, StudyRecord,
};
use crate::session::{AccountService, Credentials, Profile, ProfileSettings, Registration, Session};
use crate::speech::{AffordanceState, SpeechOutput, SpeechService, Speed};
use crate::status::{ActionKind, ServiceChoice, ServiceStatus};
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::translate::{Translation, TranslationService};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Speak {
        text: String,
        #[serde(default)]
        speed: Speed,
    },
    Translate {
        text: String,
    },
    Save {
        text: String,
        #[serde(default)]
        translation: String,
    },
    ListHistory,
    /// Load one record into the editor. `view` is the caller's current listing.
    FindRecord {
        id: RecordId,
        #[serde(default)]
        view: Option<HistoryView>,
    },
    DeleteSelected {
        ids: Vec<RecordId>,
    },
    DeleteAll,
    Login(Credentials),
    Register(Registration),
    Logout,
    LoadProfile,
    UpdatePreferences(ProfileSettings),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Spoken {
        speed: Speed,
        choice: ServiceChoice,
        fell_back: bool,
    },
    Translated(Translation),
    Saved(SaveOutcome),
    History(HistoryView),
    Record {
        record: Option<StudyRecord>,
    },
    Deleted(DeleteOutcome),
    LoggedIn {
        username: String,
    },
    Registered,
    LoggedOut,
    Profile(Profile),
    PreferencesUpdated(Profile),
}

/// Owns the session and every service. One instance per user-facing window.
pub struct StudyApp {
    session: RwLock<Session>,
    status: Mutex<ServiceStatus>,
    speech: SpeechService,
    translation: TranslationService,
    history: HistoryStore,
    accounts: AccountService,
}

impl StudyApp {
    pub fn new(
        config: &StudyConfig,
        backend: Arc<dyn StudyBackend>,
        store: Arc<dyn KeyValueStore>,
        output: Arc<dyn SpeechOutput>,
    ) -> Self {
        let session = Session::restore(store.as_ref());
        let status = ServiceStatus::for_session(&session);
        let dictionary = Dictionary::with_overrides(config.dictionary_overrides.iter());
        tracing::info!(
            "[Session] Starting as {} with {} dictionary entries",
            session.display_name(),
            dictionary.len()
        );

        Self {
            speech: SpeechService::new(backend.clone(), output, config),
            translation: TranslationService::new(backend.clone(), dictionary),
            history: HistoryStore::new(
                backend.clone(),
                LocalHistory::new(store.clone(), config.history_limit),
            ),
            accounts: AccountService::new(backend, store),
            session: RwLock::new(session),
            status: Mutex::new(status),
        }
    }

    /// HTTP backend and JSON file storage, both as configured.
    pub fn from_config(config: &StudyConfig, output: Arc<dyn SpeechOutput>) -> StudyResult<Self> {
        let backend = Arc::new(HttpBackend::from_config(config)?);
        let store = Arc::new(JsonFileStore::new(config.storage_file()));
        tracing::info!(
            "[Config] Backend {} with local storage at {}",
            backend.base_url(),
            store.path().display()
        );
        Ok(Self::new(config, backend, store, output))
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn status(&self) -> ServiceStatus {
        self.status.lock().await.clone()
    }

    pub fn affordances(&self) -> AffordanceState {
        self.speech.affordances()
    }

    pub fn subscribe_affordances(&self) -> watch::Receiver<AffordanceState> {
        self.speech.subscribe()
    }

    pub async fn handle(&self, intent: Intent) -> StudyResult<Outcome> {
        match intent {
            Intent::Speak { text, speed } => self.speak(&text, speed).await,
            Intent::Translate { text } => {
                let session = self.session().await;
                let translation = self.translation.translate(&session, &text).await?;
                self.status
                    .lock()
                    .await
                    .record(ActionKind::Translation, &translation.choice);
                Ok(Outcome::Translated(translation))
            }
            Intent::Save { text, translation } => {
                let session = self.session().await;
                Ok(Outcome::Saved(
                    self.history.save(&session, &text, &translation).await?,
                ))
            }
            Intent::ListHistory => {
                let session = self.session().await;
                Ok(Outcome::History(self.history.list(&session).await?))
            }
            Intent::FindRecord { id, view } => Ok(Outcome::Record {
                record: self.history.find(view.as_ref(), &id)?,
            }),
            Intent::DeleteSelected { ids } => {
                let session = self.session().await;
                Ok(Outcome::Deleted(
                    self.history.delete_selected(&session, &ids).await?,
                ))
            }
            Intent::DeleteAll => {
                let session = self.session().await;
                Ok(Outcome::Deleted(self.history.delete_all(&session).await?))
            }
            Intent::Login(credentials) => {
                let mut session = self.session.write().await;
                self.accounts.login(&mut session, &credentials).await?;
                self.refresh_status(&session).await;
                Ok(Outcome::LoggedIn {
                    username: session.display_name().to_string(),
                })
            }
            Intent::Register(registration) => {
                self.accounts.register(&registration).await?;
                Ok(Outcome::Registered)
            }
            Intent::Logout => {
                let mut session = self.session.write().await;
                self.accounts.logout(&mut session)?;
                self.refresh_status(&session).await;
                Ok(Outcome::LoggedOut)
            }
            Intent::LoadProfile => {
                let mut session = self.session.write().await;
                let profile = self.accounts.load_profile(&mut session).await?;
                self.refresh_status(&session).await;
                Ok(Outcome::Profile(profile))
            }
            Intent::UpdatePreferences(settings) => {
                let mut session = self.session.write().await;
                let profile = self
                    .accounts
                    .update_preferences(&mut session, &settings)
                    .await?;
                self.refresh_status(&session).await;
                Ok(Outcome::PreferencesUpdated(profile))
            }
        }
    }

    /// Choosing a speed is remembered whatever happens to playback. The
    /// preference PUT runs alongside playback, off the session lock.
    async fn speak(&self, text: &str, speed: Speed) -> StudyResult<Outcome> {
        let session = self.session().await;
        self.status.lock().await.active_speed = speed;

        let (spoken, update) = tokio::join!(
            self.speech.speak(&session, text, speed),
            self.accounts.send_speed(&session, speed)
        );
        if let Some(update) = update {
            let mut session = self.session.write().await;
            self.accounts.apply_speed(&mut session, &update);
        }

        let resolution = spoken?;
        let fell_back = resolution.fell_back();
        self.status
            .lock()
            .await
            .record(ActionKind::Speech, &resolution.choice);

        Ok(Outcome::Spoken {
            speed,
            choice: resolution.choice,
            fell_back,
        })
    }

    async fn refresh_status(&self, session: &Session) {
        *self.status.lock().await = ServiceStatus::for_session(session);
    }
}
