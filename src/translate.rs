//! English → Korean translation: remote service first, local dictionary second.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::backend::StudyBackend;
use crate::chain::{ResolutionChain, Tier, TierOutcome};
use crate::dictionary::Dictionary;
use crate::error::{StudyError, StudyResult};
use crate::session::{Session, TranslationPreference};
use crate::speech::service::EMPTY_TEXT_MESSAGE;
use crate::status::ServiceChoice;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub text: String,
    pub choice: ServiceChoice,
    /// True when the remote service failed and the dictionary answered.
    pub fell_back: bool,
}

// ── Tiers ──────────────────────────────────────────────

pub struct RemoteTranslationTier {
    backend: Arc<dyn StudyBackend>,
}

impl RemoteTranslationTier {
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tier<String, String> for RemoteTranslationTier {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn attempt(&self, text: &String, session: &Session) -> TierOutcome<String> {
        let service = if session.is_authenticated() {
            session.preferences().translation_service
        } else {
            TranslationPreference::Auto
        };

        match self.backend.translate(text, service, session.token()).await {
            Ok(resp) if resp.success => match resp.translation {
                Some(t) if !t.trim().is_empty() => {
                    let choice = resp
                        .service
                        .map(ServiceChoice::from)
                        .unwrap_or(ServiceChoice::Google);
                    TierOutcome::resolved(t, choice)
                }
                _ => TierOutcome::Next(StudyError::rejected(None, "empty translation")),
            },
            Ok(_) => TierOutcome::Next(StudyError::rejected(None, "translation was not successful")),
            Err(e) => TierOutcome::Next(e),
        }
    }
}

/// Offline dictionary. Always answers.
pub struct DictionaryTier {
    dictionary: Dictionary,
}

impl DictionaryTier {
    pub fn new(dictionary: Dictionary) -> Self {
        Self { dictionary }
    }
}

#[async_trait]
impl Tier<String, String> for DictionaryTier {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    async fn attempt(&self, text: &String, _session: &Session) -> TierOutcome<String> {
        TierOutcome::resolved(self.dictionary.translate(text), ServiceChoice::Basic)
    }
}

// ── Service ────────────────────────────────────────────

pub struct TranslationService {
    chain: ResolutionChain<String, String>,
}

impl TranslationService {
    pub fn new(backend: Arc<dyn StudyBackend>, dictionary: Dictionary) -> Self {
        let chain = ResolutionChain::new("Translate")
            .with_tier(RemoteTranslationTier::new(backend))
            .with_tier(DictionaryTier::new(dictionary));
        Self { chain }
    }

    pub async fn translate(&self, session: &Session, text: &str) -> StudyResult<Translation> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StudyError::Validation(EMPTY_TEXT_MESSAGE.to_string()));
        }

        let resolution = self.chain.resolve(&text.to_string(), session).await?;
        let fell_back = resolution.fell_back();
        Ok(Translation {
            text: resolution.value,
            choice: resolution.choice,
            fell_back,
        })
    }
}
