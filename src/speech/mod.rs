pub mod affordance;
pub mod interface;
pub mod output;
pub mod service;
pub mod tiers;

pub use affordance::{AffordanceGuard, AffordanceState, Affordances};
pub use interface::{AudioClip, SpeechOutput, Speed, Utterance};
pub use output::{ChannelOutput, PlaybackCommand, PlaybackRequest};
pub use service::SpeechService;
pub use tiers::{NativeSpeechTier, RemoteSpeechTier, SpeakRequest};
