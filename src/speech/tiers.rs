use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use std::time::Duration;

use super::interface::{AudioClip, SpeechOutput, Speed, Utterance};
use crate::backend::{StudyBackend, AUTO_SERVICE};
use crate::chain::{Tier, TierOutcome};
use crate::config::RateTable;
use crate::error::StudyError;
use crate::session::Session;
use crate::status::ServiceChoice;

const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    pub text: String,
    pub speed: Speed,
}

// ── Remote Synthesis ───────────────────────────────────

/// Ask the backend for audio and play it. Any failure moves on to native speech.
pub struct RemoteSpeechTier {
    backend: Arc<dyn StudyBackend>,
    output: Arc<dyn SpeechOutput>,
    rates: RateTable,
    playback_timeout: Duration,
}

impl RemoteSpeechTier {
    pub fn new(
        backend: Arc<dyn StudyBackend>,
        output: Arc<dyn SpeechOutput>,
        rates: RateTable,
        playback_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            output,
            rates,
            playback_timeout,
        }
    }
}

#[async_trait]
impl Tier<SpeakRequest, ()> for RemoteSpeechTier {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn attempt(&self, request: &SpeakRequest, session: &Session) -> TierOutcome<()> {
        let response = match self
            .backend
            .synthesize(&request.text, request.speed, AUTO_SERVICE, session.token())
            .await
        {
            Ok(r) => r,
            Err(e) => return TierOutcome::Next(e),
        };

        if !response.success {
            return TierOutcome::Next(StudyError::rejected(None, "synthesis was not successful"));
        }

        let encoded = match response.audio_data.as_deref() {
            Some(data) if !data.is_empty() => data,
            _ if response.use_browser_tts => {
                tracing::info!("[TTS] Backend asked for native speech");
                return TierOutcome::Next(StudyError::rejected(
                    None,
                    "backend deferred to native speech",
                ));
            }
            _ => {
                return TierOutcome::Next(StudyError::rejected(None, "response carried no audio"))
            }
        };

        let data = match STANDARD.decode(encoded.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                return TierOutcome::Next(StudyError::Playback(format!(
                    "undecodable audio payload: {}",
                    e
                )))
            }
        };

        let clip = AudioClip {
            data,
            content_type: response
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        };
        let rate = self.rates.rate_for(request.speed);

        tracing::debug!(
            "[TTS] Playing {} bytes of {} at {}x",
            clip.data.len(),
            clip.content_type,
            rate
        );
        match tokio::time::timeout(self.playback_timeout, self.output.play_audio(clip, rate)).await {
            Ok(Ok(())) => {
                let choice = response
                    .service
                    .map(ServiceChoice::from)
                    .unwrap_or(ServiceChoice::Google);
                TierOutcome::resolved((), choice)
            }
            Ok(Err(e)) => TierOutcome::Next(e),
            Err(_) => TierOutcome::Next(StudyError::Timeout(format!(
                "audio playback exceeded {}s",
                self.playback_timeout.as_secs()
            ))),
        }
    }
}

// ── Native Synthesis ───────────────────────────────────

/// Host speech synthesis. Last tier, so every failure is final.
pub struct NativeSpeechTier {
    output: Arc<dyn SpeechOutput>,
    rates: RateTable,
    lang: String,
    timeout: Duration,
}

impl NativeSpeechTier {
    pub fn new(
        output: Arc<dyn SpeechOutput>,
        rates: RateTable,
        lang: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            output,
            rates,
            lang: lang.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Tier<SpeakRequest, ()> for NativeSpeechTier {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn attempt(&self, request: &SpeakRequest, _session: &Session) -> TierOutcome<()> {
        if !self.output.native_available() {
            return TierOutcome::Terminal(StudyError::LocalCapabilityMissing);
        }

        let utterance = Utterance::new(
            request.text.clone(),
            self.lang.clone(),
            self.rates.rate_for(request.speed),
        );
        match tokio::time::timeout(self.timeout, self.output.speak_native(utterance)).await {
            Ok(Ok(())) => TierOutcome::resolved((), ServiceChoice::Browser),
            Ok(Err(e)) => TierOutcome::Terminal(e),
            Err(_) => TierOutcome::Terminal(StudyError::Timeout(format!(
                "native speech exceeded {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
