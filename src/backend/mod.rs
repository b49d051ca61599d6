//! The remote study backend: translation, speech, accounts and history.

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{
    LoginResponse, ProfileResponse, SynthesizeResponse, TranslateResponse, AUTO_SERVICE,
};

use async_trait::async_trait;

use crate::error::StudyResult;
use crate::history::{RecordId, StudyRecord};
use crate::session::{ProfilePatch, ProfileSettings, TranslationPreference};
use crate::speech::Speed;

/// Everything the app asks of the server. `token` is `None` for guests;
/// account-scoped calls require it.
#[async_trait]
pub trait StudyBackend: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        service: TranslationPreference,
        token: Option<&str>,
    ) -> StudyResult<TranslateResponse>;

    async fn synthesize(
        &self,
        text: &str,
        speed: Speed,
        service: &str,
        token: Option<&str>,
    ) -> StudyResult<SynthesizeResponse>;

    async fn login(&self, username: &str, password: &str) -> StudyResult<LoginResponse>;

    async fn register(&self, username: &str, email: &str, password: &str) -> StudyResult<()>;

    async fn get_profile(&self, token: &str) -> StudyResult<ProfileResponse>;

    async fn put_profile(&self, token: &str, settings: &ProfileSettings)
        -> StudyResult<ProfilePatch>;

    /// Returns the id the backend assigned, when it reports one.
    async fn save_study_record(
        &self,
        token: &str,
        text: &str,
        translation: &str,
    ) -> StudyResult<Option<RecordId>>;

    /// Newest first.
    async fn list_study_history(&self, token: &str) -> StudyResult<Vec<StudyRecord>>;

    /// Returns the number of records the backend deleted.
    async fn delete_study_records(&self, token: &str, ids: &[RecordId]) -> StudyResult<usize>;

    async fn delete_all_study_records(&self, token: &str) -> StudyResult<usize>;
}
