use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use super::interface::Speed;

/// What the speed buttons should look like right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AffordanceState {
    pub enabled: bool,
    /// Speed whose button shows "Playing...".
    pub playing: Option<Speed>,
}

impl AffordanceState {
    pub const IDLE: AffordanceState = AffordanceState {
        enabled: true,
        playing: None,
    };
}

/// Observable enable/disable state for the playback controls.
#[derive(Clone)]
pub struct Affordances {
    tx: Arc<watch::Sender<AffordanceState>>,
}

impl Default for Affordances {
    fn default() -> Self {
        Self::new()
    }
}

impl Affordances {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AffordanceState::IDLE);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<AffordanceState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> AffordanceState {
        *self.tx.borrow()
    }

    /// Disable the controls until the returned guard is dropped.
    pub fn disable(&self, speed: Speed) -> AffordanceGuard {
        self.tx.send_replace(AffordanceState {
            enabled: false,
            playing: Some(speed),
        });
        AffordanceGuard {
            tx: self.tx.clone(),
        }
    }
}

/// Re-enables the controls exactly once, on drop.
#[must_use = "controls are re-enabled as soon as the guard is dropped"]
pub struct AffordanceGuard {
    tx: Arc<watch::Sender<AffordanceState>>,
}

impl Drop for AffordanceGuard {
    fn drop(&mut self) {
        self.tx.send_replace(AffordanceState::IDLE);
    }
}
