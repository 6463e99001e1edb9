use crate::error::{Result, TedError};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Padding added to the declared intro length before captions start.
pub const INTRO_PADDING_SECS: f64 = 1.0;

const STREAMS_MARKER: &str = r#""htmlStreams"\s*:"#;

static STREAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STREAMS_MARKER).expect("valid streams marker"));
// Tokens appear either URL-encoded (`introDuration%22%3A12.5`) or as plain JSON.
static INTRO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"introDuration(?:%22%3A|"\s*:\s*)(\d+(?:\.\d+)?)"#).expect("valid intro regex")
});
static TALK_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"talkId(?:%22%3A|"\s*:\s*)(\d+)"#).expect("valid talk id regex")
});

#[derive(Debug, Deserialize)]
struct StreamDescriptor {
    id: String,
    file: String,
}

/// Quality name to stream URL. Quality names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSet {
    streams: BTreeMap<String, String>,
}

impl StreamSet {
    /// Add a stream; a repeated quality replaces the earlier URL.
    pub fn insert(&mut self, quality: &str, url: impl Into<String>) {
        self.streams.insert(quality.to_lowercase(), url.into());
    }

    /// Look up a stream URL, ignoring the case of `quality`.
    pub fn get(&self, quality: &str) -> Option<&str> {
        self.streams.get(&quality.to_lowercase()).map(String::as_str)
    }

    pub fn qualities(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TalkMetadata {
    pub talk_id: u64,
    /// Where caption time zero sits in the played stream, in milliseconds.
    pub intro_offset_ms: f64,
}

impl TalkMetadata {
    pub fn new(talk_id: u64, intro_duration_secs: f64) -> Self {
        Self {
            talk_id,
            intro_offset_ms: intro_offset_ms(intro_duration_secs),
        }
    }
}

/// Everything a talk page tells us about playback.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTalk {
    pub streams: StreamSet,
    pub metadata: TalkMetadata,
}

pub fn intro_offset_ms(intro_duration_secs: f64) -> f64 {
    (intro_duration_secs + INTRO_PADDING_SECS) * 1000.0
}

/// Parse a talk page. Any missing piece makes the talk unavailable.
pub fn parse_talk_page(page: &str) -> Result<ResolvedTalk> {
    let streams = extract_streams(page)
        .ok_or_else(|| TedError::StreamUnavailable("no stream list on talk page".to_string()))?;

    let intro_duration = capture_number::<f64>(&INTRO_DURATION, page)
        .ok_or_else(|| TedError::StreamUnavailable("no intro duration on talk page".to_string()))?;

    let talk_id = capture_number::<u64>(&TALK_ID, page)
        .ok_or_else(|| TedError::StreamUnavailable("no talk id on talk page".to_string()))?;

    debug!(
        "Talk {}: {} stream(s), intro {}s",
        talk_id,
        streams.len(),
        intro_duration
    );

    Ok(ResolvedTalk {
        streams,
        metadata: TalkMetadata::new(talk_id, intro_duration),
    })
}

/// Find the embedded `"htmlStreams": [...]` array and decode it.
///
/// Only the first JSON value after the marker is read, so whatever script
/// follows the array is left alone.
fn extract_streams(page: &str) -> Option<StreamSet> {
    let marker = STREAMS.find(page)?;
    let rest = &page[marker.end()..];

    let descriptors = match serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<StreamDescriptor>>()
        .next()?
    {
        Ok(descriptors) => descriptors,
        Err(e) => {
            debug!("Stream list is not valid JSON: {}", e);
            return None;
        }
    };

    let mut streams = StreamSet::default();
    for descriptor in descriptors {
        streams.insert(&descriptor.id, descriptor.file);
    }

    (!streams.is_empty()).then_some(streams)
}

fn capture_number<T: std::str::FromStr>(regex: &Regex, page: &str) -> Option<T> {
    regex.captures(page)?.get(1)?.as_str().parse().ok()
}
