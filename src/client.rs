use crate::config::Config;
use crate::error::{Result, TedError};
use reqwest::{Client, Proxy, Url};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("tedstream/", env!("CARGO_PKG_VERSION"));

/// Owns the HTTP client and the site root; passed explicitly to the pipeline.
#[derive(Debug, Clone)]
pub struct TedClient {
    client: Client,
    base_url: Url,
}

impl TedClient {
    /// Build a client from configuration (timeout, proxy and base URL).
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT);

        if let Some(ref proxy) = config.proxy {
            let proxy = Proxy::all(proxy.as_str())
                .map_err(|e| TedError::Config(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;
        let base_url = parse_base_url(&config.base_url)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Search page URL; terms are form-encoded so spaces become `+`.
    pub fn search_url(&self, terms: &[String]) -> Result<Url> {
        let query = terms.join(" ");
        let endpoint = self.join("search")?;
        Url::parse_with_params(endpoint.as_str(), &[("cat", "ss_talks"), ("q", query.as_str())])
            .map_err(|e| TedError::Config(format!("Invalid search URL: {}", e)))
    }

    pub fn captions_url(&self, talk_id: u64, language: &str) -> Result<Url> {
        self.join(&format!("talks/subtitles/id/{}/lang/{}", talk_id, language))
    }

    /// GET a page, treating a non-success status as a failure.
    pub async fn fetch_page(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        debug!("{} -> {}", url, response.status());
        let body = response.error_for_status()?.text().await?;
        Ok(body)
    }

    /// GET a document and return its body whatever the status code.
    ///
    /// The caption endpoint answers unsupported languages with an error
    /// status and a JSON body describing the problem, which callers need.
    pub async fn fetch_document(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        debug!("{} -> {}", url, response.status());
        Ok(response.text().await?)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| TedError::Config(format!("Cannot resolve '{}': {}", path, e)))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // Url::join replaces the last path segment unless the base ends in '/'
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| TedError::Config(format!("Invalid base URL '{}': {}", raw, e)))
}
