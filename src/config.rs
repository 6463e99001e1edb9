use crate::error::{Result, TedError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://www.ted.com";

/// External video players that can receive a stream URL and a subtitle file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    #[default]
    Mpv,
    Mplayer,
    Vlc,
    Cvlc,
}

impl Player {
    pub fn executable(&self) -> &'static str {
        match self {
            Player::Mpv => "mpv",
            Player::Mplayer => "mplayer",
            Player::Vlc => "vlc",
            Player::Cvlc => "cvlc",
        }
    }

    /// Command-line flag the player expects in front of a subtitle file.
    pub fn subtitle_flag(&self) -> &'static str {
        match self {
            Player::Mpv => "--sub-file",
            Player::Mplayer => "-sub",
            Player::Vlc | Player::Cvlc => "--sub-file",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.executable())
    }
}

impl std::str::FromStr for Player {
    type Err = TedError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mpv" => Ok(Player::Mpv),
            "mplayer" => Ok(Player::Mplayer),
            "vlc" => Ok(Player::Vlc),
            "cvlc" => Ok(Player::Cvlc),
            _ => Err(TedError::InvalidSelection(format!(
                "Unknown player: {}. Use 'mpv', 'mplayer', 'vlc' or 'cvlc'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Subtitle language code (e.g. en, es, zh-cn). `None` disables subtitles.
    pub subtitle_language: Option<String>,
    pub quality: String,
    pub player: Player,
    pub proxy: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subtitle_language: None,
            quality: "high".to_string(),
            player: Player::default(),
            proxy: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                match toml::from_str::<Config>(&contents) {
                    Ok(file_config) => config = file_config,
                    Err(e) => warn!("Ignoring unreadable config {:?}: {}", config_path, e),
                }
            }
        }

        // Override with environment variables
        if let Ok(lang) = std::env::var("TEDSTREAM_SUBTITLE_LANG") {
            config.subtitle_language = Some(lang);
        }
        if let Ok(quality) = std::env::var("TEDSTREAM_QUALITY") {
            config.quality = quality;
        }
        if let Ok(player) = std::env::var("TEDSTREAM_PLAYER") {
            config.player = player.parse()?;
        }
        if let Ok(proxy) = std::env::var("TEDSTREAM_PROXY") {
            config.proxy = Some(proxy);
        }
        if let Ok(base_url) = std::env::var("TEDSTREAM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("TEDSTREAM_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                config.timeout_secs = t;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(TedError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.base_url.trim().is_empty() {
            return Err(TedError::Config("Base URL must not be empty".to_string()));
        }

        if self.quality.trim().is_empty() {
            return Err(TedError::Config("Quality must not be empty".to_string()));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tedstream").join("config.toml"))
    }
}
