pub mod client;
pub mod config;
pub mod error;
pub mod interactive;
pub mod pipeline;
pub mod player;
pub mod search;
pub mod stream;
pub mod subtitle;

pub use client::TedClient;
pub use config::{Config, Player};
pub use error::{Result, TedError};
pub use pipeline::{Playback, PlaybackOptions, ResolutionPipeline};
pub use search::TalkRecord;
pub use stream::{ResolvedTalk, StreamSet, TalkMetadata};
pub use subtitle::{CaptionConversion, SubtitleDiagnostic, SubtitleEntry, SubtitleTrack};
