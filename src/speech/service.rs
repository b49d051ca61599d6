use std::sync::Arc;
use tokio::sync::{watch, Semaphore};

use super::affordance::{AffordanceState, Affordances};
use super::interface::{SpeechOutput, Speed};
use super::tiers::{NativeSpeechTier, RemoteSpeechTier, SpeakRequest};
use crate::backend::StudyBackend;
use crate::chain::{Resolution, ResolutionChain};
use crate::config::StudyConfig;
use crate::error::{StudyError, StudyResult};
use crate::session::Session;

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter English text!";

/// Speaks text through the remote synthesizer, falling back to native speech.
///
/// Calls are serialized: a second `speak` waits for the first to settle, so
/// playback never overlaps.
pub struct SpeechService {
    chain: ResolutionChain<SpeakRequest, ()>,
    gate: Semaphore,
    affordances: Affordances,
}

impl SpeechService {
    pub fn new(
        backend: Arc<dyn StudyBackend>,
        output: Arc<dyn SpeechOutput>,
        config: &StudyConfig,
    ) -> Self {
        let chain = ResolutionChain::new("TTS")
            .with_tier(RemoteSpeechTier::new(
                backend,
                output.clone(),
                config.playback_rates,
                config.playback_timeout(),
            ))
            .with_tier(NativeSpeechTier::new(
                output,
                config.native_rates,
                config.native_lang.clone(),
                config.playback_timeout(),
            ));

        Self {
            chain,
            gate: Semaphore::new(1),
            affordances: Affordances::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AffordanceState> {
        self.affordances.subscribe()
    }

    pub fn affordances(&self) -> AffordanceState {
        self.affordances.current()
    }

    pub async fn speak(
        &self,
        session: &Session,
        text: &str,
        speed: Speed,
    ) -> StudyResult<Resolution<()>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StudyError::Validation(EMPTY_TEXT_MESSAGE.to_string()));
        }

        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| StudyError::Playback(format!("Queue error: {}", e)))?;
        let _guard = self.affordances.disable(speed);

        tracing::info!(
            "[TTS] Speaking {} chars at {} for {}",
            text.chars().count(),
            speed,
            session.display_name()
        );
        let request = SpeakRequest {
            text: text.to_string(),
            speed,
        };
        self.chain.resolve(&request, session).await
    }
}
