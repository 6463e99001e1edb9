// Search results: one `article.search__result` block per talk.
use crate::error::{Result, TedError};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static ENTRY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.search__result").expect("valid entry selector"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".search__result__title a[href]").expect("valid title selector")
});
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".search__result__description").expect("valid description selector")
});

/// One talk found by a search, in the order the site listed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkRecord {
    pub title: String,
    pub relative_url: String,
    pub description: String,
}

impl TalkRecord {
    /// Resolve the talk's href under the site root, keeping any path prefix
    /// the root carries (`http://host/mirror/` + `/talks/x` gives
    /// `http://host/mirror/talks/x`). Absolute hrefs are used as-is.
    pub fn absolute_url(&self, base: &Url) -> Result<Url> {
        let href = match self.relative_url.strip_prefix('/') {
            Some(rest) if !rest.starts_with('/') => rest,
            _ => self.relative_url.as_str(),
        };
        base.join(href).map_err(|e| {
            TedError::Config(format!(
                "Cannot resolve talk URL '{}': {}",
                self.relative_url, e
            ))
        })
    }
}

/// Extract talk records from a search-results document.
///
/// Returns an empty list when the page has no result blocks.
pub fn parse_search_results(html: &str) -> Vec<TalkRecord> {
    let document = Html::parse_document(html);

    document
        .select(&ENTRY)
        .enumerate()
        .filter_map(|(position, entry)| {
            let record = parse_entry(entry);
            if record.is_none() {
                debug!("Skipping search result #{} without a usable title link", position);
            }
            record
        })
        .collect()
}

fn parse_entry(entry: ElementRef<'_>) -> Option<TalkRecord> {
    let link = entry.select(&TITLE_LINK).next()?;

    let relative_url = link.value().attr("href")?.trim().to_string();
    let title = collapse_whitespace(link.text());
    if relative_url.is_empty() || title.is_empty() {
        return None;
    }

    let description = entry
        .select(&DESCRIPTION)
        .next()
        .map(|node| collapse_whitespace(node.text()))
        .unwrap_or_default();

    Some(TalkRecord {
        title,
        relative_url,
        description,
    })
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
