use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::interface::{AudioClip, SpeechOutput, Utterance};
use crate::error::{StudyError, StudyResult};

/// Work handed to the host's audio layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    Audio { clip: AudioClip, rate: f32 },
    /// Cancel any current native speech, then speak this.
    Native(Utterance),
}

/// A command plus the channel the host uses to report completion.
#[derive(Debug)]
pub struct PlaybackRequest {
    pub command: PlaybackCommand,
    done: oneshot::Sender<Result<(), String>>,
}

impl PlaybackRequest {
    /// Report that playback ended (`Ok`) or failed (`Err(message)`).
    pub fn complete(self, result: Result<(), String>) {
        // The speaker may already have timed out and gone away.
        let _ = self.done.send(result);
    }
}

/// `SpeechOutput` that forwards playback to whoever owns the receiving end,
/// typically the presentation layer, and waits for its acknowledgement.
pub struct ChannelOutput {
    tx: mpsc::Sender<PlaybackRequest>,
    native_available: bool,
}

impl ChannelOutput {
    pub fn new(buffer: usize, native_available: bool) -> (Self, mpsc::Receiver<PlaybackRequest>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                tx,
                native_available,
            },
            rx,
        )
    }

    async fn dispatch(&self, command: PlaybackCommand) -> StudyResult<()> {
        let (done, finished) = oneshot::channel();
        self.tx
            .send(PlaybackRequest { command, done })
            .await
            .map_err(|_| StudyError::Playback("no playback host attached".to_string()))?;

        match finished.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(msg)) => Err(StudyError::Playback(msg)),
            Err(_) => Err(StudyError::Playback("playback was abandoned".to_string())),
        }
    }
}

#[async_trait]
impl SpeechOutput for ChannelOutput {
    async fn play_audio(&self, clip: AudioClip, rate: f32) -> StudyResult<()> {
        self.dispatch(PlaybackCommand::Audio { clip, rate }).await
    }

    fn native_available(&self) -> bool {
        self.native_available
    }

    async fn speak_native(&self, utterance: Utterance) -> StudyResult<()> {
        if !self.native_available {
            return Err(StudyError::LocalCapabilityMissing);
        }
        self.dispatch(PlaybackCommand::Native(utterance)).await
    }
}
