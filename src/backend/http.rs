use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::{
    DeleteResponse, DeleteSelectedRequest, ErrorBody, HistoryResponse, LoginRequest,
    LoginResponse, ProfileResponse, ProfileUpdateResponse, RegisterRequest, SaveRequest,
    SaveResponse, SynthesizeRequest, SynthesizeResponse, TranslateRequest, TranslateResponse,
};
use super::StudyBackend;
use crate::config::StudyConfig;
use crate::error::{StudyError, StudyResult};
use crate::history::{RecordId, StudyRecord};
use crate::session::{ProfilePatch, ProfileSettings, TranslationPreference};
use crate::speech::Speed;

/// JSON-over-HTTP client for the study backend.
///
/// Credentials go in `Authorization: Token <token>`. Every request is bounded
/// by the client timeout; there are no retries.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StudyResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("english-study/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StudyError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn from_config(config: &StudyConfig) -> StudyResult<Self> {
        Self::new(config.api_url(), config.request_timeout())
    }

    /// Use a pre-configured client (proxy settings, custom TLS, tests).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => req.header("Authorization", format!("Token {}", token)),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> StudyResult<T> {
        let response = req.send().await.map_err(|e| {
            tracing::debug!("[HTTP] {} request failed: {}", what, e);
            StudyError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .error
                .or(parsed.message)
                .unwrap_or_else(|| format!("{} failed with status {}", what, status));
            return Err(StudyError::rejected(Some(status.as_u16()), message));
        }

        response.json::<T>().await.map_err(|e| {
            StudyError::rejected(
                Some(status.as_u16()),
                format!("invalid {} response: {}", what, e),
            )
        })
    }
}

#[async_trait]
impl StudyBackend for HttpBackend {
    async fn translate(
        &self,
        text: &str,
        service: TranslationPreference,
        token: Option<&str>,
    ) -> StudyResult<TranslateResponse> {
        let req = self
            .client
            .post(self.url("translate/"))
            .json(&TranslateRequest { text, service });
        self.send(Self::authorize(req, token), "translate").await
    }

    async fn synthesize(
        &self,
        text: &str,
        speed: Speed,
        service: &str,
        token: Option<&str>,
    ) -> StudyResult<SynthesizeResponse> {
        let req = self
            .client
            .post(self.url("text-to-speech/"))
            .json(&SynthesizeRequest {
                text,
                speed,
                service,
            });
        self.send(Self::authorize(req, token), "text-to-speech").await
    }

    async fn login(&self, username: &str, password: &str) -> StudyResult<LoginResponse> {
        let req = self
            .client
            .post(self.url("auth/login/"))
            .json(&LoginRequest { username, password });
        self.send(req, "login").await
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> StudyResult<()> {
        let req = self
            .client
            .post(self.url("auth/register/"))
            .json(&RegisterRequest {
                username,
                email,
                password,
            });
        let _: serde_json::Value = self.send(req, "register").await?;
        Ok(())
    }

    async fn get_profile(&self, token: &str) -> StudyResult<ProfileResponse> {
        let req = self.client.get(self.url("auth/profile/"));
        self.send(Self::authorize(req, Some(token)), "profile").await
    }

    async fn put_profile(
        &self,
        token: &str,
        settings: &ProfileSettings,
    ) -> StudyResult<ProfilePatch> {
        let req = self.client.put(self.url("auth/profile/")).json(settings);
        let resp: ProfileUpdateResponse =
            self.send(Self::authorize(req, Some(token)), "profile update").await?;
        Ok(resp.profile)
    }

    async fn save_study_record(
        &self,
        token: &str,
        text: &str,
        translation: &str,
    ) -> StudyResult<Option<RecordId>> {
        let req = self
            .client
            .post(self.url("study/save/"))
            .json(&SaveRequest { text, translation });
        let resp: SaveResponse = self.send(Self::authorize(req, Some(token)), "save").await?;
        if !resp.success {
            return Err(StudyError::rejected(
                None,
                resp.error.unwrap_or_else(|| "save was not accepted".to_string()),
            ));
        }
        Ok(resp.item_id)
    }

    async fn list_study_history(&self, token: &str) -> StudyResult<Vec<StudyRecord>> {
        let req = self.client.get(self.url("study/history/"));
        let resp: HistoryResponse = self.send(Self::authorize(req, Some(token)), "history").await?;
        if !resp.success {
            return Err(StudyError::rejected(
                None,
                resp.error.unwrap_or_else(|| "history unavailable".to_string()),
            ));
        }
        Ok(resp.history.into_iter().map(StudyRecord::from).collect())
    }

    async fn delete_study_records(&self, token: &str, ids: &[RecordId]) -> StudyResult<usize> {
        let body = DeleteSelectedRequest {
            item_ids: ids.iter().map(ToString::to_string).collect(),
        };
        let req = self.client.delete(self.url("study/delete-selected/")).json(&body);
        let resp: DeleteResponse = self
            .send(Self::authorize(req, Some(token)), "delete selected")
            .await?;
        Ok(resp.deleted_count)
    }

    async fn delete_all_study_records(&self, token: &str) -> StudyResult<usize> {
        let req = self.client.delete(self.url("study/delete-all/"));
        let resp: DeleteResponse = self
            .send(Self::authorize(req, Some(token)), "delete all")
            .await?;
        Ok(resp.deleted_count)
    }
}
