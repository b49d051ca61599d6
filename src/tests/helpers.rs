use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::app::StudyApp;
use crate::backend::{
    LoginResponse, ProfileResponse, StudyBackend, SynthesizeResponse, TranslateResponse,
};
use crate::config::StudyConfig;
use crate::error::{StudyError, StudyResult};
use crate::history::{RecordId, StudyRecord};
use crate::session::{Profile, ProfilePatch, ProfileSettings, TranslationPreference, UserInfo};
use crate::speech::{AudioClip, SpeechOutput, Speed, Utterance};
use crate::storage::MemoryStore;

pub fn offline() -> StudyError {
    StudyError::RemoteUnavailable("connection refused".to_string())
}

// ── Mock Backend ────────────────────────────────────────────

/// Scripted backend. Every endpoint starts out unreachable.
pub struct MockBackend {
    calls: Mutex<Vec<&'static str>>,
    pub translate: Mutex<StudyResult<TranslateResponse>>,
    pub synthesize: Mutex<StudyResult<SynthesizeResponse>>,
    pub login: Mutex<StudyResult<LoginResponse>>,
    pub register: Mutex<StudyResult<()>>,
    pub profile: Mutex<StudyResult<ProfileResponse>>,
    pub put_profile: Mutex<StudyResult<ProfilePatch>>,
    pub save: Mutex<StudyResult<Option<RecordId>>>,
    pub history: Mutex<StudyResult<Vec<StudyRecord>>>,
    pub delete: Mutex<StudyResult<usize>>,
    pub last_translation_service: Mutex<Option<TranslationPreference>>,
    pub last_token: Mutex<Option<String>>,
    pub last_deleted_ids: Mutex<Vec<RecordId>>,
    pub last_settings: Mutex<Option<ProfileSettings>>,
}

impl MockBackend {
    pub fn offline() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            translate: Mutex::new(Err(offline())),
            synthesize: Mutex::new(Err(offline())),
            login: Mutex::new(Err(offline())),
            register: Mutex::new(Err(offline())),
            profile: Mutex::new(Err(offline())),
            put_profile: Mutex::new(Err(offline())),
            save: Mutex::new(Err(offline())),
            history: Mutex::new(Err(offline())),
            delete: Mutex::new(Err(offline())),
            last_translation_service: Mutex::new(None),
            last_token: Mutex::new(None),
            last_deleted_ids: Mutex::new(Vec::new()),
            last_settings: Mutex::new(None),
        }
    }

    pub fn set<T>(slot: &Mutex<StudyResult<T>>, value: StudyResult<T>) {
        *slot.lock().unwrap() = value;
    }

    pub fn with_audio(self, service: &str) -> Self {
        Self::set(&self.synthesize, Ok(audio_response(service)));
        self
    }

    pub fn with_translation(self, text: &str, service: &str) -> Self {
        Self::set(
            &self.translate,
            Ok(TranslateResponse {
                success: true,
                translation: Some(text.to_string()),
                service: Some(service.to_string()),
            }),
        );
        self
    }

    pub fn with_login(self) -> Self {
        Self::set(&self.login, Ok(login_response()));
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str, token: Option<&str>) {
        self.calls.lock().unwrap().push(name);
        *self.last_token.lock().unwrap() = token.map(str::to_string);
    }

    fn current<T: Clone>(slot: &Mutex<StudyResult<T>>) -> StudyResult<T> {
        slot.lock().unwrap().clone()
    }
}

#[async_trait]
impl StudyBackend for MockBackend {
    async fn translate(
        &self,
        _text: &str,
        service: TranslationPreference,
        token: Option<&str>,
    ) -> StudyResult<TranslateResponse> {
        self.record("translate", token);
        *self.last_translation_service.lock().unwrap() = Some(service);
        Self::current(&self.translate)
    }

    async fn synthesize(
        &self,
        _text: &str,
        _speed: Speed,
        _service: &str,
        token: Option<&str>,
    ) -> StudyResult<SynthesizeResponse> {
        self.record("synthesize", token);
        Self::current(&self.synthesize)
    }

    async fn login(&self, _username: &str, _password: &str) -> StudyResult<LoginResponse> {
        self.record("login", None);
        Self::current(&self.login)
    }

    async fn register(&self, _username: &str, _email: &str, _password: &str) -> StudyResult<()> {
        self.record("register", None);
        Self::current(&self.register)
    }

    async fn get_profile(&self, token: &str) -> StudyResult<ProfileResponse> {
        self.record("get_profile", Some(token));
        Self::current(&self.profile)
    }

    async fn put_profile(
        &self,
        token: &str,
        settings: &ProfileSettings,
    ) -> StudyResult<ProfilePatch> {
        self.record("put_profile", Some(token));
        *self.last_settings.lock().unwrap() = Some(settings.clone());
        Self::current(&self.put_profile)
    }

    async fn save_study_record(
        &self,
        token: &str,
        _text: &str,
        _translation: &str,
    ) -> StudyResult<Option<RecordId>> {
        self.record("save", Some(token));
        Self::current(&self.save)
    }

    async fn list_study_history(&self, token: &str) -> StudyResult<Vec<StudyRecord>> {
        self.record("history", Some(token));
        Self::current(&self.history)
    }

    async fn delete_study_records(&self, token: &str, ids: &[RecordId]) -> StudyResult<usize> {
        self.record("delete_selected", Some(token));
        *self.last_deleted_ids.lock().unwrap() = ids.to_vec();
        Self::current(&self.delete)
    }

    async fn delete_all_study_records(&self, token: &str) -> StudyResult<usize> {
        self.record("delete_all", Some(token));
        Self::current(&self.delete)
    }
}

pub fn audio_response(service: &str) -> SynthesizeResponse {
    SynthesizeResponse {
        success: true,
        audio_data: Some(STANDARD.encode(b"ID3 fake mp3 frames")),
        use_browser_tts: false,
        content_type: Some("audio/mpeg".to_string()),
        service: Some(service.to_string()),
    }
}

pub fn login_response() -> LoginResponse {
    LoginResponse {
        token: "token_42".to_string(),
        user: UserInfo {
            id: 42,
            username: "jisoo".to_string(),
            email: "jisoo@example.com".to_string(),
        },
        profile: Profile {
            can_use_ai: true,
            has_groq_key: true,
            ..Profile::default()
        },
    }
}

// ── Recording Speech Output ─────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Played {
    Audio { rate: f32, bytes: usize },
    Native { text: String, rate: f32, lang: String },
}

/// Host audio stand-in that records what it was asked to play and how many
/// playbacks were ever in flight at once.
pub struct RecordingOutput {
    native: bool,
    fail_audio: bool,
    fail_native: bool,
    hang_audio: bool,
    delay: Duration,
    played: Mutex<Vec<Played>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self {
            native: true,
            fail_audio: false,
            fail_native: false,
            hang_audio: false,
            delay: Duration::ZERO,
            played: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn without_native(mut self) -> Self {
        self.native = false;
        self
    }

    pub fn failing_audio(mut self) -> Self {
        self.fail_audio = true;
        self
    }

    pub fn failing_native(mut self) -> Self {
        self.fail_native = true;
        self
    }

    pub fn hanging_audio(mut self) -> Self {
        self.hang_audio = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn played(&self) -> Vec<Played> {
        self.played.lock().unwrap().clone()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    async fn occupy(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SpeechOutput for RecordingOutput {
    async fn play_audio(&self, clip: AudioClip, rate: f32) -> StudyResult<()> {
        if self.hang_audio {
            std::future::pending::<()>().await;
        }
        if self.fail_audio {
            return Err(StudyError::Playback("autoplay blocked".to_string()));
        }
        self.occupy().await;
        self.played.lock().unwrap().push(Played::Audio {
            rate,
            bytes: clip.data.len(),
        });
        Ok(())
    }

    fn native_available(&self) -> bool {
        self.native
    }

    async fn speak_native(&self, utterance: Utterance) -> StudyResult<()> {
        if self.fail_native {
            return Err(StudyError::Playback("synthesis-failed".to_string()));
        }
        self.occupy().await;
        self.played.lock().unwrap().push(Played::Native {
            text: utterance.text,
            rate: utterance.rate,
            lang: utterance.lang,
        });
        Ok(())
    }
}

// ── App Setup ───────────────────────────────────────────────

pub struct Harness {
    pub app: StudyApp,
    pub backend: Arc<MockBackend>,
    pub store: Arc<MemoryStore>,
    pub output: Arc<RecordingOutput>,
}

pub fn harness(backend: MockBackend, output: RecordingOutput) -> Harness {
    harness_with(StudyConfig::default(), backend, Arc::new(MemoryStore::new()), output)
}

pub fn harness_with(
    config: StudyConfig,
    backend: MockBackend,
    store: Arc<MemoryStore>,
    output: RecordingOutput,
) -> Harness {
    crate::logging::init_for_tests();
    let backend = Arc::new(backend);
    let output = Arc::new(output);
    let app = StudyApp::new(&config, backend.clone(), store.clone(), output.clone());
    Harness {
        app,
        backend,
        store,
        output,
    }
}

/// Seed `store` with a persisted login so the app starts authenticated.
pub fn seed_login(store: &MemoryStore) {
    let mut session = crate::session::Session::guest();
    let resp = login_response();
    session
        .establish(
            crate::session::Identity {
                token: resp.token,
                user: resp.user,
                profile: resp.profile,
            },
            store,
        )
        .unwrap();
}
