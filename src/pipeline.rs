use crate::client::TedClient;
use crate::config::Config;
use crate::error::{Result, TedError};
use crate::search::{parse_search_results, TalkRecord};
use crate::stream::{parse_talk_page, ResolvedTalk};
use crate::subtitle::{convert_captions, CaptionConversion};
use tracing::{debug, info, warn};

/// What to resolve for a talk before playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Stream quality identifier, matched case-insensitively.
    pub quality: String,
    /// Subtitle language code; `None` skips the caption fetch.
    pub subtitle_language: Option<String>,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            quality: "high".to_string(),
            subtitle_language: None,
        }
    }
}

impl From<&Config> for PlaybackOptions {
    fn from(config: &Config) -> Self {
        Self {
            quality: config.quality.clone(),
            subtitle_language: config.subtitle_language.clone(),
        }
    }
}

/// A talk ready to hand to a player.
#[derive(Debug, Clone)]
pub struct Playback {
    pub title: String,
    pub stream_url: String,
    /// Present when subtitles were requested, even if the track is empty.
    pub subtitles: Option<CaptionConversion>,
}

/// Resolves talks, streams and subtitles. Every call fetches again; nothing is cached.
#[derive(Debug, Clone)]
pub struct ResolutionPipeline {
    client: TedClient,
}

impl ResolutionPipeline {
    pub fn new(client: TedClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TedClient {
        &self.client
    }

    /// Search for talks. An empty list means the search matched nothing.
    pub async fn resolve_talks(&self, terms: &[String]) -> Result<Vec<TalkRecord>> {
        let url = self.client.search_url(terms)?;
        info!("Searching for '{}'", terms.join(" "));

        let page = self.client.fetch_page(&url).await?;
        let talks = parse_search_results(&page);

        if talks.is_empty() {
            info!("No talks found for '{}'", terms.join(" "));
        } else {
            debug!("Found {} talk(s)", talks.len());
        }

        Ok(talks)
    }

    /// Fetch a talk page and parse its streams and timing metadata.
    pub async fn resolve_talk(&self, talk: &TalkRecord) -> Result<ResolvedTalk> {
        let url = talk.absolute_url(self.client.base_url())?;
        let page = self.client.fetch_page(&url).await?;

        parse_talk_page(&page).inspect_err(|e| warn!("{}: {}", talk.title, e))
    }

    pub async fn resolve_stream(&self, talk: &TalkRecord, quality: &str) -> Result<String> {
        let resolved = self.resolve_talk(talk).await?;
        select_stream(&resolved, quality)
    }

    pub async fn resolve_subtitles(
        &self,
        talk: &TalkRecord,
        language: &str,
    ) -> Result<CaptionConversion> {
        let resolved = self.resolve_talk(talk).await?;
        self.fetch_subtitles(&resolved, language).await
    }

    /// Resolve the stream and, if requested, the subtitles from one page fetch.
    ///
    /// Subtitle problems, including a failed caption fetch, never stop
    /// playback; they are reported through the conversion's diagnostic.
    pub async fn prepare_playback(
        &self,
        talk: &TalkRecord,
        options: &PlaybackOptions,
    ) -> Result<Playback> {
        let resolved = self.resolve_talk(talk).await?;
        let stream_url = select_stream(&resolved, &options.quality)?;

        let subtitles = match options.subtitle_language.as_deref() {
            Some(language) => match self.fetch_subtitles(&resolved, language).await {
                Ok(conversion) => Some(conversion),
                Err(e) => {
                    warn!("Could not fetch '{}' subtitles: {}", language, e);
                    None
                }
            },
            None => None,
        };

        Ok(Playback {
            title: talk.title.clone(),
            stream_url,
            subtitles,
        })
    }

    async fn fetch_subtitles(
        &self,
        resolved: &ResolvedTalk,
        language: &str,
    ) -> Result<CaptionConversion> {
        let url = self
            .client
            .captions_url(resolved.metadata.talk_id, language)?;
        let payload = self.client.fetch_document(&url).await?;

        let conversion = convert_captions(&payload, resolved.metadata.intro_offset_ms);
        match &conversion.diagnostic {
            Some(diagnostic) => warn!("Subtitle '{}': {}", language, diagnostic),
            None => info!(
                "Loaded {} '{}' subtitle entries",
                conversion.track.len(),
                language
            ),
        }

        Ok(conversion)
    }
}

/// Pick a stream by quality; an unknown quality is a caller error.
pub fn select_stream(resolved: &ResolvedTalk, quality: &str) -> Result<String> {
    resolved
        .streams
        .get(quality)
        .map(str::to_string)
        .ok_or_else(|| {
            TedError::InvalidSelection(format!(
                "Unknown quality '{}'. Available: {}",
                quality,
                resolved.streams.qualities().collect::<Vec<_>>().join(", ")
            ))
        })
}
